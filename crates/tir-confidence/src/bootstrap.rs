//! Cluster bootstrap for panel estimators
//!
//! Replicates are independent: each draws subjects from the unmodified input
//! panel with its own random stream (`ChaCha8Rng` on stream `i` of the run
//! seed), so results for a fixed seed do not depend on the execution engine
//! or on replicate scheduling.

use crate::{
    cluster_resample, BootstrapMethod, ConfidenceInterval, ConfidenceLevel, PercentileBootstrap,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tir_core::{
    utils, CancellationToken, Error, ExecutionEngine, Panel, PanelEstimator, PointEstimate, Result,
    TimeWindow,
};
use tracing::{debug, instrument, warn};

/// Result of a cluster bootstrap run
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapResult {
    /// Estimate on the original panel
    pub estimate: PointEstimate,
    /// Sample standard deviation of the replicate estimates
    pub standard_error: f64,
    /// Interval built by the bootstrap method
    pub interval: ConfidenceInterval,
    /// Number of bootstrap resamples performed
    pub n_resamples: usize,
    /// Replicate estimates in replicate order
    pub replicates: Vec<f64>,
    /// Replicates whose estimate carried numeric warnings
    pub degenerate_replicates: usize,
    /// Time taken for bootstrap (if measured)
    pub bootstrap_time_ms: Option<u64>,
}

/// Resamples whole subjects and re-runs a point estimator on each resample
#[derive(Clone)]
pub struct ClusterBootstrap<E, M = PercentileBootstrap> {
    engine: E,
    method: M,
    n_resamples: usize,
    confidence_level: ConfidenceLevel,
    seed: Option<u64>,
    cancellation: Option<CancellationToken>,
}

impl<E, M> ClusterBootstrap<E, M>
where
    E: ExecutionEngine,
    M: BootstrapMethod,
{
    /// Create a new bootstrap engine
    pub fn new(engine: E, method: M) -> Self {
        Self {
            engine,
            method,
            n_resamples: 1000,
            confidence_level: ConfidenceLevel::NINETY_FIVE,
            seed: None,
            cancellation: None,
        }
    }

    /// Set the number of bootstrap resamples
    ///
    /// Fewer than two resamples leave no spread to measure and make `run`
    /// fail.
    pub fn with_resamples(mut self, n_resamples: usize) -> Self {
        self.n_resamples = n_resamples;
        self
    }

    /// Set the confidence level
    pub fn with_confidence_level(mut self, confidence_level: ConfidenceLevel) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Abort the run when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn n_resamples(&self) -> usize {
        self.n_resamples
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn validate(&self) -> Result<()> {
        if self.n_resamples < 2 {
            return Err(Error::InsufficientData {
                expected: 2,
                actual: self.n_resamples,
            });
        }
        Ok(())
    }

    /// Estimate on `panel` and bootstrap the estimator over resampled panels
    ///
    /// Any failed replicate aborts the run; the first failure by replicate
    /// index is returned as [`Error::ReplicateFailed`].
    #[instrument(skip(self, estimator, panel, window), fields(
        estimator = estimator.name(),
        n_subjects = panel.n_subjects(),
        n_resamples = self.n_resamples,
    ))]
    pub fn run<P>(&self, estimator: &P, panel: &Panel, window: &TimeWindow) -> Result<BootstrapResult>
    where
        P: PanelEstimator + ?Sized,
    {
        self.validate()?;
        if panel.is_empty() {
            return Err(Error::InvalidInput("Cannot bootstrap an empty panel".to_string()));
        }
        self.check_cancelled()?;

        let start_time = Instant::now();
        let estimate = estimator.estimate(panel, window)?;
        let seed = self.seed.unwrap_or_else(|| rand::thread_rng().gen());

        debug!(
            seed,
            estimate = estimate.value,
            confidence_level = %self.confidence_level,
            parallel = self.engine.is_parallel(),
            n_threads = self.engine.num_threads(),
            "Running cluster bootstrap"
        );

        let aborted = AtomicBool::new(false);
        let outcomes = self.engine.execute_batch(self.n_resamples, |i| {
            if aborted.load(Ordering::Relaxed) {
                return None;
            }
            let outcome = self.replicate(estimator, panel, window, seed, i);
            if outcome.is_err() {
                aborted.store(true, Ordering::Relaxed);
            }
            Some(outcome)
        });

        let mut replicates = Vec::with_capacity(self.n_resamples);
        let mut degenerate_replicates = 0;
        let mut first_failure = None;
        for (i, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Some(Ok(point)) => {
                    if point.is_degenerate() {
                        degenerate_replicates += 1;
                    }
                    replicates.push(point.value);
                }
                Some(Err(Error::Cancelled)) => return Err(Error::Cancelled),
                Some(Err(source)) => {
                    if first_failure.is_none() {
                        first_failure = Some(Error::ReplicateFailed {
                            replicate: i,
                            source: Box::new(source),
                        });
                    }
                }
                None => {}
            }
        }
        if let Some(err) = first_failure {
            warn!(error = %err, "Bootstrap aborted");
            return Err(err);
        }

        if degenerate_replicates > 0 {
            warn!(degenerate_replicates, "Replicates raised numeric warnings");
        }

        let standard_error = utils::std_dev(&replicates);
        let interval =
            self.method
                .calculate_interval(&replicates, estimate.value, self.confidence_level)?;

        debug!(
            standard_error,
            lower = interval.lower,
            upper = interval.upper,
            method = self.method.name(),
            "Bootstrap completed"
        );

        Ok(BootstrapResult {
            estimate,
            standard_error,
            interval,
            n_resamples: self.n_resamples,
            replicates,
            degenerate_replicates,
            bootstrap_time_ms: Some(start_time.elapsed().as_millis() as u64),
        })
    }

    fn replicate<P>(
        &self,
        estimator: &P,
        panel: &Panel,
        window: &TimeWindow,
        seed: u64,
        index: usize,
    ) -> Result<PointEstimate>
    where
        P: PanelEstimator + ?Sized,
    {
        self.check_cancelled()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(index as u64);
        let resampled = cluster_resample(panel, &mut rng);
        let point = estimator.estimate(&resampled, window)?;
        if !point.value.is_finite() {
            return Err(Error::non_finite("replicate estimate"));
        }
        Ok(point)
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancellation {
            Some(token) => token.check(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::atomic::AtomicUsize;
    use tir_core::{derive_row_features, sequential, Record, TargetRange};

    /// Fraction of in-range rows, pooled over the whole panel
    struct PooledMean;

    impl PanelEstimator for PooledMean {
        fn estimate(&self, panel: &Panel, window: &TimeWindow) -> Result<PointEstimate> {
            let values: Vec<f64> = panel
                .observations()
                .filter(|(_, o)| window.contains(o.time))
                .map(|(_, o)| o.indicator())
                .collect();
            if values.is_empty() {
                return Err(window.empty_error());
            }
            Ok(PointEstimate::new(utils::mean(&values)))
        }

        fn name(&self) -> &'static str {
            "pooled"
        }
    }

    /// Fails once it has been called `limit` times
    struct FailAfter {
        calls: AtomicUsize,
        limit: usize,
    }

    impl PanelEstimator for FailAfter {
        fn estimate(&self, _panel: &Panel, _window: &TimeWindow) -> Result<PointEstimate> {
            if self.calls.fetch_add(1, Ordering::SeqCst) >= self.limit {
                Err(Error::FitConvergence("singular".to_string()))
            } else {
                Ok(PointEstimate::new(0.5))
            }
        }

        fn name(&self) -> &'static str {
            "fail-after"
        }
    }

    fn cohort() -> Panel {
        let records = (0..20).flat_map(|s| {
            (0..4).map(move |k| {
                let value = if (s + k) % 3 == 0 { 250.0 } else { 120.0 };
                Record::new(format!("p{s}"), 5.0 * k as f64, value)
            })
        });
        let panel = Panel::from_records(Vec::new(), records).unwrap();
        derive_row_features(&panel, TargetRange::STANDARD_GLUCOSE, 5.0).unwrap()
    }

    fn bootstrap(n: usize) -> ClusterBootstrap<tir_core::SequentialEngine> {
        ClusterBootstrap::new(sequential(), PercentileBootstrap)
            .with_resamples(n)
            .with_seed(42)
    }

    #[test]
    fn test_rejects_fewer_than_two_resamples() {
        let panel = cohort();
        for n in [0, 1] {
            let err = bootstrap(n)
                .run(&PooledMean, &panel, &TimeWindow::default())
                .unwrap_err();
            assert!(matches!(err, Error::InsufficientData { expected: 2, .. }));
        }
    }

    #[test]
    fn test_confidence_level_sets_interval() {
        let panel = cohort();
        let window = TimeWindow::default();
        let wide = bootstrap(200).run(&PooledMean, &panel, &window).unwrap();
        let narrow = bootstrap(200)
            .with_confidence_level(ConfidenceLevel::new(0.5).unwrap())
            .run(&PooledMean, &panel, &window)
            .unwrap();

        assert_eq!(wide.interval.confidence_level, 0.95);
        assert_eq!(narrow.interval.confidence_level, 0.5);
        assert_eq!(wide.replicates, narrow.replicates);
        assert!(narrow.interval.lower >= wide.interval.lower);
        assert!(narrow.interval.upper <= wide.interval.upper);
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let panel = cohort();
        let window = TimeWindow::default();
        let a = bootstrap(50).run(&PooledMean, &panel, &window).unwrap();
        let b = bootstrap(50).run(&PooledMean, &panel, &window).unwrap();
        assert_eq!(a.replicates, b.replicates);
        assert_eq!(a.standard_error, b.standard_error);
        assert_eq!(a.interval, b.interval);

        let c = bootstrap(50).with_seed(7).run(&PooledMean, &panel, &window).unwrap();
        assert_ne!(a.replicates, c.replicates);
    }

    #[test]
    fn test_point_estimate_independent_of_seed_and_count() {
        let panel = cohort();
        let window = TimeWindow::default();
        let direct = PooledMean.estimate(&panel, &window).unwrap().value;
        for (seed, n) in [(1, 2), (2, 30), (3, 100)] {
            let result = bootstrap(n)
                .with_seed(seed)
                .run(&PooledMean, &panel, &window)
                .unwrap();
            assert_eq!(result.estimate.value, direct);
            assert_eq!(result.replicates.len(), n);
            assert_eq!(result.n_resamples, n);
        }
    }

    #[test]
    fn test_summary_statistics() {
        let result = bootstrap(200)
            .run(&PooledMean, &cohort(), &TimeWindow::default())
            .unwrap();
        assert_relative_eq!(result.standard_error, utils::std_dev(&result.replicates));
        assert!(result.standard_error > 0.0);
        assert!(result.interval.lower <= result.interval.upper);
        assert!(result.replicates.iter().all(|r| (0.0..=1.0).contains(r)));
        assert_eq!(result.degenerate_replicates, 0);
    }

    #[test]
    fn test_replicate_failure_aborts() {
        let estimator = FailAfter {
            calls: AtomicUsize::new(0),
            limit: 4,
        };
        let err = bootstrap(10)
            .run(&estimator, &cohort(), &TimeWindow::default())
            .unwrap_err();
        // Call 0 is the original estimate, so replicate 3 is the first to fail
        match &err {
            Error::ReplicateFailed { replicate, .. } => assert_eq!(*replicate, 3),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.is_fit_failure());
        // Remaining replicates were skipped
        assert_eq!(estimator.calls.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_cancelled_run() {
        let token = CancellationToken::new();
        token.cancel();
        let err = bootstrap(10)
            .with_cancellation(token)
            .run(&PooledMean, &cohort(), &TimeWindow::default())
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[test]
    fn test_empty_panel_rejected() {
        let empty = Panel::from_records(Vec::new(), Vec::<Record>::new()).unwrap();
        assert!(bootstrap(10)
            .run(&PooledMean, &empty, &TimeWindow::default())
            .is_err());
    }
}
