use plotters::prelude::*;

use quanta::quantum::{CoherentField, FieldPattern, QuantumConfig, QuantumField};

const STEPS: usize = 60;
const OUT_PATH: &str = "decoherence_decay.png";

/// Строит график падения когерентности поля: каждый такт —
/// шаг эволюции, каждый четвёртый — дополнительная декогеренция
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut field = CoherentField::initialized(QuantumConfig::default());
    let mut series = Vec::with_capacity(STEPS + 1);
    series.push(field.coherence());

    for step in 0..STEPS {
        field.evolve(FieldPattern::Chaos)?;
        if step % 4 == 3 {
            field.decohere()?;
        }
        series.push(field.coherence());
    }

    let root = BitMapBackend::new(OUT_PATH, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Затухание когерентности", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0i32..(STEPS as i32), 0f64..1f64)?;
    chart
        .configure_mesh()
        .x_desc("такт")
        .y_desc("когерентность")
        .draw()?;
    chart.draw_series(LineSeries::new(
        series
            .iter()
            .enumerate()
            .map(|(step, value)| (step as i32, *value)),
        &BLUE,
    ))?;
    root.present()?;

    println!("chart saved to {}", OUT_PATH);
    println!("final coherence: {:.4}, entropy: {:.4}", field.coherence(), field.entropy());
    Ok(())
}
