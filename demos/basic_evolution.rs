use env_logger::Env;

use quanta::quantum::{CoherentField, FieldPattern, QuantumConfig, QuantumField, QuantumState};

/// Прогоняет одно поле через все внешние паттерны и показывает,
/// как меняются фаза, когерентность и энтропия
fn main() -> quanta::Result<()> {
    let _ = env_logger::Builder::from_env(Env::default().filter_or("RUST_LOG", "info")).try_init();

    let config = QuantumConfig::default();
    let patterns = [
        FieldPattern::Stable,
        FieldPattern::Chaos,
        FieldPattern::Oscillate,
        FieldPattern::Spiral,
    ];

    for pattern in patterns {
        let mut field = CoherentField::initialized(config.clone());
        println!("--- pattern {:?} ({:?}) ---", pattern, pattern.rule());
        for step in 0..10 {
            field.evolve(pattern)?;
            let state = field.state().expect("поле инициализировано");
            println!(
                "step {:2}: phase={:.4}, probability={:.4}, entropy={:.4}, stability={:.4}",
                step + 1,
                state.phase(),
                state.probability(),
                state.entropy(),
                state.stability()
            );
        }
    }

    // Запутывание с партнёром и наблюдение
    let mut field = CoherentField::initialized(config);
    field.evolve(FieldPattern::Oscillate)?;

    let mut partner = QuantumState::new();
    partner.set_phase(1.2);
    partner.set_probability(0.4);
    partner.set_energy(2.0);
    field.entangle(&partner)?;
    println!(
        "after entangle: probability={:.4}, field entropy={:.4}",
        field.state().expect("поле инициализировано").probability(),
        field.entropy()
    );

    let observed = field.measure()?;
    println!(
        "measured phase {:.4}; collapsed probability {:.1}",
        observed,
        field.state().expect("поле инициализировано").probability()
    );

    Ok(())
}
