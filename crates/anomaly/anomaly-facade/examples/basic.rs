//! Basic example: score a short temperature trace with every method
//!
//! Run with: cargo run --example basic -p anomaly-facade

use anomaly_facade::prelude::*;
use anomaly_facade::{ChangeFinderConfig, IsolationForestConfig, LofConfig};

fn main() -> Result<()> {
    println!("=== Sensor Anomaly Detection ===\n");

    let mut values: Vec<f64> = (0..240)
        .map(|i| 82.0 + (i as f64 * 0.1).sin() * 2.0)
        .collect();
    values[100] = 12.0;
    values[200] = 3.5;

    let config = PipelineConfig {
        isolation_forest: IsolationForestConfig::new(100, 128, 0.05),
        lof: LofConfig::new(20, 0.05),
        change_finder: ChangeFinderConfig::new(0.02, 1, 15),
        ..PipelineConfig::default()
    };

    let table = ScoringPipeline::new().with_all().config(config).run(&values)?;

    for (kind, result) in table.iter() {
        println!(
            "{:28} threshold {:>10.4}  flagged {:>3}  first {:?}",
            kind.title(),
            result.threshold,
            result.anomaly_count(),
            result.anomaly_indices().iter().take(5).collect::<Vec<_>>()
        );
    }

    println!("\n=== Done ===");
    Ok(())
}
