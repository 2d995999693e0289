//! Compare the three estimators on a simulated cohort with informative dropout
//!
//! Run with `RUST_LOG=tir_estimate=debug` to see per-stage progress.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use tir_core::{Panel, Record, TargetRange};
use tir_estimate::{estimate_tir, Method, Model, TirConfig};
use tracing_subscriber::EnvFilter;

fn simulate(n_subjects: usize, seed: u64) -> Result<Panel, Box<dyn std::error::Error>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let risk = Normal::new(0.0, 1.0)?;
    let noise = Normal::new(0.0, 30.0)?;

    let mut records = Vec::new();
    for s in 0..n_subjects {
        let var1: f64 = risk.sample(&mut rng);
        let dropout = (0.01 * (1.2 * var1).exp()).min(0.5);
        for k in 0..400 {
            let glucose = 140.0 + 35.0 * var1.max(0.0) + noise.sample(&mut rng);
            records.push(
                Record::new(format!("patient-{s}"), 5.0 * k as f64, glucose)
                    .with_covariates(vec![var1]),
            );
            if rng.gen::<f64>() < dropout {
                break;
            }
        }
    }
    Ok(Panel::from_records(vec!["var1".to_string()], records)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let panel = simulate(200, 7)?;
    println!(
        "{} subjects, {} observations\n",
        panel.n_subjects(),
        panel.n_observations()
    );

    let base = TirConfig::new()
        .with_range(TargetRange::STANDARD_GLUCOSE)
        .with_bootstrap(100)
        .with_seed(42);

    let runs = [
        ("naive", base.clone().with_method(Method::Naive)),
        ("non-informative", base.clone()),
        (
            "hazard weighted",
            base.clone().with_model(Model::Hazard).with_formula("var1"),
        ),
    ];

    for (label, config) in runs {
        let result = estimate_tir(&panel, &config)?;
        println!("{label}\n{}\n", result.rounded(3));
        println!("{}\n", serde_json::to_string(&result.rounded(4))?);
    }

    Ok(())
}
