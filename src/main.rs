use std::f64::consts::PI;
use std::thread;
use std::time::Duration;

use clap::Parser;
use env_logger::Env;
use log::info;

use quanta::quantum::{FieldPattern, QuantumConfig, QuantumState, QuantumSystem};

/// Драйвер симуляции: заселяет систему, гоняет эволюцию поля,
/// резонанс соседей и периодические измерения
#[derive(Parser, Debug)]
#[command(name = "quanta", about = "Симуляция когерентных квантовых состояний")]
struct Args {
    /// Количество состояний в системе
    #[arg(long, default_value_t = 8)]
    states: usize,

    /// Число тактов симуляции
    #[arg(long, default_value_t = 32)]
    steps: usize,

    /// Внешний паттерн эволюции поля (stable|chaos|oscillate|spiral)
    #[arg(long, default_value = "oscillate")]
    pattern: String,

    /// Каждые сколько тактов измерять поле
    #[arg(long, default_value_t = 8)]
    measure_every: usize,

    /// Печатать итоговые метрики в JSON
    #[arg(long)]
    json: bool,
}

fn main() -> quanta::Result<()> {
    let env = Env::default().filter_or("RUST_LOG", "info");
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .try_init();

    let args = Args::parse();
    let pattern = FieldPattern::from_name(&args.pattern);
    let config = QuantumConfig::default();
    let tick = Duration::from_secs_f64(config.update_interval);

    info!(
        "Starting quanta: states={}, steps={}, pattern={:?}",
        args.states, args.steps, pattern
    );

    let mut system = QuantumSystem::new(config.clone());
    for i in 0..args.states {
        let mut state = QuantumState::with_dimension(config.dimension);
        // Детерминированное заселение: фазы веером, вероятности волной
        state.set_phase(i as f64 * PI / args.states.max(1) as f64);
        state.set_probability(0.5 + 0.4 * (i as f64).sin());
        state.set_energy(1.0 + i as f64 * 0.25);
        system.add_state(format!("q{}", i), state);
    }

    for step in 0..args.steps {
        system.evolve_field(pattern)?;

        // Резонанс кольцом: каждый сосед делится энергией со следующим
        for i in 0..args.states {
            let a = format!("q{}", i);
            let b = format!("q{}", (i + 1) % args.states.max(1));
            if a != b {
                system.resonate(&a, &b)?;
            }
        }

        if args.measure_every > 0 && (step + 1) % args.measure_every == 0 {
            let observed = system.measure_field()?;
            info!("step {}: measured phase {:.4}", step + 1, observed);
        }

        info!(
            "step {}: coherence={:.4}, entanglement={:.4}, energy={:.4}",
            step + 1,
            system.coherence(),
            system.entanglement(),
            system.energy()
        );
        thread::sleep(tick);
    }

    let metrics = system.metrics();
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&metrics).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let mut names: Vec<&String> = metrics.keys().collect();
        names.sort();
        for name in names {
            println!("{:>18}: {:.6}", name, metrics[name]);
        }
    }

    Ok(())
}
