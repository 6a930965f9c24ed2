use std::f64::consts::PI;

use quanta::quantum::{FieldPattern, QuantumConfig, QuantumState, QuantumSystem};

/// Заселяет систему, связывает и резонирует пары состояний
/// и печатает агрегированные метрики до и после
fn main() -> quanta::Result<()> {
    let config = QuantumConfig::default();
    let mut system = QuantumSystem::new(config.clone());

    for i in 0..6 {
        let mut state = QuantumState::with_dimension(config.dimension);
        state.set_phase(i as f64 * PI / 6.0);
        state.set_probability(0.3 + 0.1 * i as f64);
        state.set_energy(1.0 + i as f64);
        system.add_state(format!("node{}", i), state);
    }

    println!("before:");
    dump(&system);

    for i in (0..6).step_by(2) {
        system.entangle(&format!("node{}", i), &format!("node{}", i + 1))?;
    }
    for i in 0..5 {
        system.resonate(&format!("node{}", i), &format!("node{}", i + 1))?;
    }
    for _ in 0..12 {
        system.evolve_field(FieldPattern::Oscillate)?;
    }
    let observed = system.measure_field()?;
    println!("measured field phase: {:.4}", observed);

    println!("after:");
    dump(&system);

    println!(
        "json: {}",
        serde_json::to_string(&system.metrics()).unwrap_or_else(|_| "{}".to_string())
    );
    Ok(())
}

fn dump(system: &QuantumSystem) {
    let metrics = system.metrics();
    let mut names: Vec<&String> = metrics.keys().collect();
    names.sort();
    for name in names {
        println!("  {:>16}: {:.6}", name, metrics[name]);
    }
}
