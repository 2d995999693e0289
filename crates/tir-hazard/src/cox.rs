//! Time-varying Cox proportional hazards fitter
//!
//! Counting-process formulation: each observation contributes the interval
//! `(time, interval_stop]` to the risk sets it overlaps, and a subject's
//! event row records a death at its `interval_stop`. Ties use the Breslow
//! approximation. Covariates are standardised before fitting and a ridge
//! penalty `0.5 * penalizer * ||beta||^2` is applied on that scale; the
//! reported coefficients are rescaled back to the original units.

use crate::baseline::BaselineHazard;
use crate::formula::Formula;
use crate::traits::{FittedHazard, HazardModel};
use nalgebra::{DMatrix, DVector};
use ordered_float::OrderedFloat;
use tir_core::{Error, Observation, Panel, Result};
use tracing::{debug, instrument};

/// Ridge-penalised Cox model for time-varying covariates
#[derive(Debug, Clone)]
pub struct CoxTimeVaryingFitter {
    formula: Formula,
    penalizer: f64,
    max_iterations: usize,
    tolerance: f64,
}

impl Default for CoxTimeVaryingFitter {
    fn default() -> Self {
        Self {
            formula: Formula::default(),
            penalizer: Self::DEFAULT_PENALIZER,
            max_iterations: 50,
            tolerance: 1e-7,
        }
    }
}

impl CoxTimeVaryingFitter {
    pub const DEFAULT_PENALIZER: f64 = 0.1;

    /// Create a fitter for the covariates named by `formula`
    pub fn new(formula: Formula) -> Self {
        Self {
            formula,
            ..Self::default()
        }
    }

    /// Set the ridge penalty strength
    pub fn with_penalizer(mut self, penalizer: f64) -> Self {
        self.penalizer = penalizer;
        self
    }

    /// Set the Newton-Raphson iteration limit
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance on the Newton step norm
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn penalizer(&self) -> f64 {
        self.penalizer
    }

    fn validate(&self) -> Result<()> {
        if !self.penalizer.is_finite() || self.penalizer < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "Penalizer must be finite and non-negative, got {}",
                self.penalizer
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidParameter(
                "Iteration limit must be positive".to_string(),
            ));
        }
        if !(self.tolerance > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "Tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

impl HazardModel for CoxTimeVaryingFitter {
    type Fitted = CoxFit;

    #[instrument(skip(self, panel), fields(formula = %self.formula, n_rows = panel.n_observations()))]
    fn fit(&self, panel: &Panel) -> Result<CoxFit> {
        self.validate()?;
        panel.require_features()?;

        let columns = self.formula.resolve(panel.covariate_names())?;
        let design = Design::build(panel, &columns)?;
        if design.event_times.is_empty() {
            return Err(Error::FitConvergence("panel contains no events".to_string()));
        }

        let (beta, log_likelihood, iterations) = self.newton_raphson(&design)?;
        let baseline = design.breslow_baseline(&beta)?;

        let coefficients: Vec<f64> = beta
            .iter()
            .zip(&design.scales)
            .map(|(b, s)| b / s)
            .collect();

        debug!(
            iterations,
            log_likelihood,
            n_event_times = design.event_times.len(),
            "Cox model converged"
        );

        Ok(CoxFit {
            columns,
            names: self.formula.terms().to_vec(),
            means: design.means,
            coefficients,
            baseline,
            log_likelihood,
            iterations,
        })
    }
}

impl CoxTimeVaryingFitter {
    fn newton_raphson(&self, design: &Design) -> Result<(Vec<f64>, f64, usize)> {
        let p = design.p;
        let mut beta = vec![0.0; p];
        let mut state = design.accumulate(&beta, self.penalizer)?;

        if p == 0 {
            return Ok((beta, state.log_likelihood, 0));
        }

        for iteration in 1..=self.max_iterations {
            let information = DMatrix::from_row_slice(p, p, &state.information);
            let gradient = DVector::from_vec(state.gradient.clone());
            let cholesky = information.cholesky().ok_or_else(|| {
                Error::FitConvergence(
                    "information matrix is not positive definite; covariates may be collinear"
                        .to_string(),
                )
            })?;
            let delta = cholesky.solve(&gradient);
            if delta.iter().any(|d| !d.is_finite()) {
                return Err(Error::FitConvergence("Newton step is not finite".to_string()));
            }

            let mut step = 1.0;
            let (candidate, next) = loop {
                let candidate: Vec<f64> = beta
                    .iter()
                    .zip(delta.iter())
                    .map(|(b, d)| b + step * d)
                    .collect();
                let next = design.accumulate(&candidate, self.penalizer)?;
                if next.log_likelihood.is_finite()
                    && next.log_likelihood >= state.log_likelihood - 1e-12 * state.log_likelihood.abs()
                {
                    break (candidate, next);
                }
                step *= 0.5;
                if step < 1e-10 {
                    return Err(Error::FitConvergence(
                        "step halving failed to improve the partial likelihood".to_string(),
                    ));
                }
            };

            let step_norm = step * delta.norm();
            let improvement = (next.log_likelihood - state.log_likelihood).abs();
            beta = candidate;
            state = next;
            debug!(iteration, step_norm, log_likelihood = state.log_likelihood, "Newton step");

            if step_norm < self.tolerance || improvement < self.tolerance * 1e-3 {
                return Ok((beta, state.log_likelihood, iteration));
            }
        }

        Err(Error::FitConvergence(format!(
            "no convergence after {} iterations",
            self.max_iterations
        )))
    }
}

/// Fitted time-varying Cox model
#[derive(Debug, Clone)]
pub struct CoxFit {
    columns: Vec<usize>,
    names: Vec<String>,
    means: Vec<f64>,
    coefficients: Vec<f64>,
    baseline: BaselineHazard,
    log_likelihood: f64,
    iterations: usize,
}

impl CoxFit {
    /// Coefficients on the original covariate scale, in formula order
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn covariate_names(&self) -> &[String] {
        &self.names
    }

    /// Covariate means used to centre partial hazards
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Penalised log partial likelihood at the solution
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl FittedHazard for CoxFit {
    fn baseline_cumulative_hazard(&self) -> &BaselineHazard {
        &self.baseline
    }

    fn predict_partial_hazard(&self, observation: &Observation) -> f64 {
        let eta: f64 = self
            .columns
            .iter()
            .zip(&self.means)
            .zip(&self.coefficients)
            .map(|((&c, m), b)| (observation.covariates[c] - m) * b)
            .sum();
        eta.exp()
    }
}

/// Standardised counting-process design
struct Design {
    n: usize,
    p: usize,
    start: Vec<f64>,
    stop: Vec<f64>,
    event: Vec<bool>,
    /// Row-major `n x p`
    z: Vec<f64>,
    means: Vec<f64>,
    scales: Vec<f64>,
    event_times: Vec<f64>,
}

struct Accumulated {
    log_likelihood: f64,
    gradient: Vec<f64>,
    /// Row-major `p x p` negative Hessian
    information: Vec<f64>,
}

impl Design {
    fn build(panel: &Panel, columns: &[usize]) -> Result<Self> {
        let p = columns.len();
        let n = panel.n_observations();
        let mut start = Vec::with_capacity(n);
        let mut stop = Vec::with_capacity(n);
        let mut event = Vec::with_capacity(n);
        let mut z = Vec::with_capacity(n * p);

        for (_, obs) in panel.observations() {
            start.push(obs.time);
            stop.push(obs.interval_stop);
            event.push(obs.event);
            for &c in columns {
                let x = obs.covariates[c];
                if !x.is_finite() {
                    return Err(Error::non_finite("covariates"));
                }
                z.push(x);
            }
        }

        let mut means = vec![0.0; p];
        let mut scales = vec![1.0; p];
        for j in 0..p {
            let column: Vec<f64> = (0..n).map(|i| z[i * p + j]).collect();
            let mean = tir_core::utils::mean(&column);
            let sd = tir_core::utils::std_dev(&column);
            if !(sd > 0.0) {
                return Err(Error::FitConvergence(format!(
                    "covariate '{}' has zero variance",
                    panel.covariate_names()[columns[j]]
                )));
            }
            means[j] = mean;
            scales[j] = sd;
        }
        for i in 0..n {
            for j in 0..p {
                z[i * p + j] = (z[i * p + j] - means[j]) / scales[j];
            }
        }

        let mut event_times: Vec<f64> = stop
            .iter()
            .zip(&event)
            .filter(|(_, e)| **e)
            .map(|(&t, _)| t)
            .collect();
        event_times.sort_by_key(|&t| OrderedFloat(t));
        event_times.dedup_by_key(|t| OrderedFloat(*t));

        Ok(Self {
            n,
            p,
            start,
            stop,
            event,
            z,
            means,
            scales,
            event_times,
        })
    }

    #[inline]
    fn row(&self, i: usize) -> &[f64] {
        &self.z[i * self.p..(i + 1) * self.p]
    }

    #[inline]
    fn at_risk(&self, i: usize, t: f64) -> bool {
        self.start[i] < t && t <= self.stop[i]
    }

    #[inline]
    fn dies_at(&self, i: usize, t: f64) -> bool {
        self.event[i] && OrderedFloat(self.stop[i]) == OrderedFloat(t)
    }

    fn linear_predictor(&self, beta: &[f64]) -> Vec<f64> {
        (0..self.n)
            .map(|i| self.row(i).iter().zip(beta).map(|(z, b)| z * b).sum())
            .collect()
    }

    /// Penalised Breslow log partial likelihood, gradient and information
    fn accumulate(&self, beta: &[f64], penalizer: f64) -> Result<Accumulated> {
        let p = self.p;
        let eta = self.linear_predictor(beta);
        let shift = eta.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let shift = if shift.is_finite() { shift } else { 0.0 };
        let weights: Vec<f64> = eta.iter().map(|e| (e - shift).exp()).collect();

        let mut log_likelihood = 0.0;
        let mut gradient = vec![0.0; p];
        let mut information = vec![0.0; p * p];
        let mut s1 = vec![0.0; p];
        let mut s2 = vec![0.0; p * p];
        let mut z_deaths = vec![0.0; p];

        for &t in &self.event_times {
            let mut s0 = 0.0;
            let mut deaths = 0.0;
            let mut eta_deaths = 0.0;
            s1.iter_mut().for_each(|v| *v = 0.0);
            s2.iter_mut().for_each(|v| *v = 0.0);
            z_deaths.iter_mut().for_each(|v| *v = 0.0);

            for i in 0..self.n {
                if !self.at_risk(i, t) {
                    continue;
                }
                let w = weights[i];
                let zi = self.row(i);
                s0 += w;
                for a in 0..p {
                    s1[a] += w * zi[a];
                    for b in 0..p {
                        s2[a * p + b] += w * zi[a] * zi[b];
                    }
                }
                if self.dies_at(i, t) {
                    deaths += 1.0;
                    eta_deaths += eta[i];
                    for a in 0..p {
                        z_deaths[a] += zi[a];
                    }
                }
            }

            if deaths == 0.0 || s0 <= 0.0 {
                continue;
            }

            log_likelihood += eta_deaths - deaths * (s0.ln() + shift);
            for a in 0..p {
                let mean_a = s1[a] / s0;
                gradient[a] += z_deaths[a] - deaths * mean_a;
                for b in 0..p {
                    let mean_b = s1[b] / s0;
                    information[a * p + b] += deaths * (s2[a * p + b] / s0 - mean_a * mean_b);
                }
            }
        }

        let norm_sq: f64 = beta.iter().map(|b| b * b).sum();
        log_likelihood -= 0.5 * penalizer * norm_sq;
        for a in 0..p {
            gradient[a] -= penalizer * beta[a];
            information[a * p + a] += penalizer;
        }

        if log_likelihood.is_nan() {
            return Err(Error::non_finite("partial likelihood"));
        }

        Ok(Accumulated {
            log_likelihood,
            gradient,
            information,
        })
    }

    /// Breslow baseline cumulative hazard at each distinct event time
    fn breslow_baseline(&self, beta: &[f64]) -> Result<BaselineHazard> {
        let partial: Vec<f64> = self.linear_predictor(beta).iter().map(|e| e.exp()).collect();
        if partial.iter().any(|h| !h.is_finite()) {
            return Err(Error::non_finite("partial hazards"));
        }

        let mut cumulative = 0.0;
        let mut points = Vec::with_capacity(self.event_times.len());
        for &t in &self.event_times {
            let mut at_risk = 0.0;
            let mut deaths = 0.0;
            for i in 0..self.n {
                if self.at_risk(i, t) {
                    at_risk += partial[i];
                    if self.dies_at(i, t) {
                        deaths += 1.0;
                    }
                }
            }
            if at_risk > 0.0 {
                cumulative += deaths / at_risk;
            }
            points.push((t, cumulative));
        }

        BaselineHazard::new(points)
    }
}
