//! Performance benchmarks for the anomaly detectors

use std::hint::black_box;
use std::time::Instant;

use anomaly_facade::prelude::*;
use anomaly_facade::{ChangeFinderConfig, IsolationForestConfig, LofConfig, OneClassSvmConfig};

fn generate_data(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            85.0 + (t * 0.01).sin() * 5.0 + ((i * 31) % 17) as f64 * 0.05
        })
        .collect()
}

fn bench<F, R>(name: &str, iterations: u32, mut f: F)
where
    F: FnMut() -> R,
{
    // Warmup
    for _ in 0..3 {
        black_box(f());
    }

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(f());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations;

    println!(
        "{:34} {:>10.2?} total, {:>10.2?}/iter ({} iters)",
        name, elapsed, per_iter, iterations
    );
}

fn main() {
    println!("=== Anomaly Detector Performance Benchmarks ===\n");

    let data_1k = generate_data(1_000);
    let data_10k = generate_data(10_000);

    println!("--- Hotelling T² ---");
    bench("Hotelling fit_detect (10K)", 1000, || {
        HotellingDetector::default().fit_detect(&data_10k).unwrap()
    });

    println!("\n--- One-Class SVM ---");
    bench("OCSVM fit_detect (1K)", 5, || {
        OneClassSvmDetector::from_config(OneClassSvmConfig::default())
            .unwrap()
            .fit_detect(&data_1k)
            .unwrap()
    });

    println!("\n--- Isolation Forest ---");
    bench("IForest fit_detect (10K, 300 trees)", 5, || {
        IsolationForestDetector::from_config(IsolationForestConfig::default())
            .unwrap()
            .fit_detect(&data_10k)
            .unwrap()
    });

    println!("\n--- Local Outlier Factor ---");
    bench("LOF fit_detect (10K, k=500)", 3, || {
        LofDetector::from_config(LofConfig::default())
            .unwrap()
            .fit_detect(&data_10k)
            .unwrap()
    });

    println!("\n--- ChangeFinder ---");
    bench("ChangeFinder fit_detect (10K)", 10, || {
        ChangeFinderDetector::from_config(ChangeFinderConfig::default())
            .unwrap()
            .fit_detect(&data_10k)
            .unwrap()
    });

    println!("\n--- Pipeline ---");
    bench("Pipeline all methods (1K)", 3, || {
        ScoringPipeline::new().with_all().run(&data_1k).unwrap()
    });

    println!("\n=== Benchmarks Complete ===");
}
