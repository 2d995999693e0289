//! Shared fixtures for tir-estimate integration tests

#![allow(dead_code)]

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use tir_core::{Panel, Record};

/// Panel from `(subject, time, glucose)` triples without covariates
pub fn panel_from(rows: &[(&str, f64, f64)]) -> Panel {
    let records = rows
        .iter()
        .map(|&(subject, time, value)| Record::new(subject, time, value));
    Panel::from_records(Vec::new(), records).unwrap()
}

/// Cohort with informative dropout driven by a binary risk factor `var1`
///
/// High-risk subjects run high (mostly above 180) and leave early; low-risk
/// subjects stay mostly in range and are followed much longer.
pub fn informative_cohort(n_subjects: usize, seed: u64) -> Panel {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let high = Normal::new(210.0, 25.0).unwrap();
    let low = Normal::new(130.0, 20.0).unwrap();

    let mut records = Vec::new();
    for s in 0..n_subjects {
        let risky = s % 2 == 0;
        let (glucose, dropout) = if risky { (&high, 0.1) } else { (&low, 0.01) };
        let var1 = if risky { 1.0 } else { 0.0 };
        for k in 0..200 {
            records.push(
                Record::new(format!("s{s}"), 5.0 * k as f64, glucose.sample(&mut rng))
                    .with_covariates(vec![var1]),
            );
            if rng.gen::<f64>() < dropout {
                break;
            }
        }
    }
    Panel::from_records(vec!["var1".to_string()], records).unwrap()
}
