//! Common test utilities for tir-polars tests

#![allow(dead_code)]

use polars::prelude::*;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;

/// Long-format frame with a binary risk covariate driving dropout
pub fn cohort_frame(n_subjects: usize, seed: u64) -> DataFrame {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let high = Normal::new(210.0, 25.0).unwrap();
    let low = Normal::new(130.0, 20.0).unwrap();

    let mut ids = Vec::new();
    let mut times = Vec::new();
    let mut glucose = Vec::new();
    let mut risk = Vec::new();
    for s in 0..n_subjects {
        let risky = s % 2 == 0;
        let (dist, dropout) = if risky { (&high, 0.1) } else { (&low, 0.01) };
        for k in 0..200 {
            ids.push(format!("p{s}"));
            times.push(5 * k as i64);
            glucose.push(dist.sample(&mut rng));
            risk.push(if risky { 1.0 } else { 0.0 });
            if rng.gen::<f64>() < dropout {
                break;
            }
        }
    }

    DataFrame::new(vec![
        Series::new(PlSmallStr::from("patient_id"), ids).into(),
        Series::new(PlSmallStr::from("time"), times).into(),
        Series::new(PlSmallStr::from("glucose"), glucose).into(),
        Series::new(PlSmallStr::from("var1"), risk).into(),
    ])
    .unwrap()
}

/// Helper function to extract a single value from a result DataFrame
pub fn extract_single_value(df: &DataFrame, col_name: &str) -> f64 {
    df.column(col_name)
        .unwrap()
        .f64()
        .unwrap()
        .get(0)
        .unwrap()
}
