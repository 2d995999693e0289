//! Estimator selection and the estimation entry points
//!
//! `(naive, none)` selects the naive estimator, `(proposed, none)` the
//! non-informative one and `(proposed, hazard)` the hazard-weighted one.
//! Row features are derived once, on the whole input, before the selected
//! estimator (optionally wrapped in a cluster bootstrap) runs. The naive and
//! non-informative estimators then see only the rows inside the window, so
//! their bootstraps draw from the subjects observed there.

use crate::{
    InformativeWeightedEstimator, NaiveEstimator, NonInformativeEstimator, TirConfig, TirResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tir_confidence::{ClusterBootstrap, PercentileBootstrap};
use tir_core::{
    auto_engine, derive_row_features, AutoEngine, CancellationToken, Error, ExecutionEngine,
    Panel, PanelEstimator, Result,
};
use tir_hazard::{CoxTimeVaryingFitter, Formula, HazardModel};
use tracing::{debug, info, instrument};

/// Estimation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Per-subject averaging
    Naive,
    /// Per-time averaging, optionally hazard weighted
    #[default]
    Proposed,
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "naive" => Ok(Self::Naive),
            "proposed" => Ok(Self::Proposed),
            _ => Err(Error::InvalidParameter(format!("Unknown method '{s}'"))),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Naive => write!(f, "naive"),
            Self::Proposed => write!(f, "proposed"),
        }
    }
}

/// Censoring model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    /// Dropout assumed non-informative
    #[default]
    #[serde(alias = "null")]
    None,
    /// Dropout modelled by a time-varying hazard
    #[serde(alias = "cox")]
    Hazard,
}

impl FromStr for Model {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "null" => Ok(Self::None),
            "hazard" | "cox" => Ok(Self::Hazard),
            _ => Err(Error::InvalidParameter(format!("Unknown model '{s}'"))),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Hazard => write!(f, "hazard"),
        }
    }
}

/// The estimator a configuration selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EstimatorKind {
    Naive,
    NonInformative,
    InformativeWeighted,
}

impl EstimatorKind {
    pub fn from_config(method: Method, model: Model) -> Result<Self> {
        match (method, model) {
            (Method::Naive, Model::None) => Ok(Self::Naive),
            (Method::Proposed, Model::None) => Ok(Self::NonInformative),
            (Method::Proposed, Model::Hazard) => Ok(Self::InformativeWeighted),
            (method, model) => Err(Error::UnrecognizedConfiguration {
                method: method.to_string(),
                model: model.to_string(),
            }),
        }
    }

    /// Select from free-form names; unknown names are a configuration error
    pub fn from_names(method: &str, model: &str) -> Result<Self> {
        let unrecognized = || Error::UnrecognizedConfiguration {
            method: method.to_string(),
            model: model.to_string(),
        };
        let method: Method = method.parse().map_err(|_| unrecognized())?;
        let model: Model = model.parse().map_err(|_| unrecognized())?;
        Self::from_config(method, model).map_err(|_| unrecognized())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Naive => "naive",
            Self::NonInformative => "non-informative",
            Self::InformativeWeighted => "informative-weighted",
        }
    }
}

/// Runs the estimator a [`TirConfig`] selects
#[derive(Clone)]
pub struct Dispatcher<E = AutoEngine> {
    config: TirConfig,
    engine: E,
    cancellation: Option<CancellationToken>,
}

impl Dispatcher<AutoEngine> {
    /// Dispatcher on the best execution engine this build supports
    pub fn new(config: TirConfig) -> Self {
        Self {
            config,
            engine: auto_engine(),
            cancellation: None,
        }
    }
}

impl<E: ExecutionEngine> Dispatcher<E> {
    /// Run bootstrap replicates on another engine
    pub fn with_engine<E2: ExecutionEngine>(self, engine: E2) -> Dispatcher<E2> {
        Dispatcher {
            config: self.config,
            engine,
            cancellation: self.cancellation,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn config(&self) -> &TirConfig {
        &self.config
    }

    pub fn kind(&self) -> Result<EstimatorKind> {
        EstimatorKind::from_config(self.config.method(), self.config.model())
    }

    /// Estimate with the bundled Cox model for the hazard-weighted method
    pub fn run(&self, panel: &Panel) -> Result<TirResult> {
        let formula = Formula::parse(self.config.formula())?;
        let model = CoxTimeVaryingFitter::new(formula).with_penalizer(self.config.penalizer());
        self.run_with_model(panel, model)
    }

    /// Estimate with `model` for the hazard-weighted method
    ///
    /// The model is unused by the other methods.
    #[instrument(skip_all, fields(
        method = %self.config.method(),
        model = %self.config.model(),
        n_subjects = panel.n_subjects(),
    ))]
    pub fn run_with_model<M: HazardModel>(&self, panel: &Panel, model: M) -> Result<TirResult> {
        let kind = self.kind()?;
        self.config.validate()?;

        let featured = derive_row_features(panel, *self.config.range(), self.config.period())?;
        debug!(estimator = kind.name(), "Dispatching");

        let result = match kind {
            EstimatorKind::Naive => self.finish(&NaiveEstimator, &self.windowed(&featured)?),
            EstimatorKind::NonInformative => {
                self.finish(&NonInformativeEstimator, &self.windowed(&featured)?)
            }
            // The hazard model is fitted on the full follow-up
            EstimatorKind::InformativeWeighted => {
                self.finish(&InformativeWeightedEstimator::new(model), &featured)
            }
        }?;

        info!(estimate = result.estimate, "Time in range estimated");
        Ok(result)
    }

    /// The rows inside the window; only subjects seen there are resampled
    fn windowed(&self, featured: &Panel) -> Result<Panel> {
        let window = self.config.window();
        let restricted = featured.restricted_to(window);
        if restricted.is_empty() {
            return Err(window.empty_error());
        }
        debug!(
            n_subjects = restricted.n_subjects(),
            n_dropped = featured.n_subjects() - restricted.n_subjects(),
            "Restricted panel to window"
        );
        Ok(restricted)
    }

    fn finish<P: PanelEstimator>(&self, estimator: &P, panel: &Panel) -> Result<TirResult> {
        let window = self.config.window();
        let Some(n_resamples) = self.config.bootstrap() else {
            if let Some(token) = &self.cancellation {
                token.check()?;
            }
            return estimator.estimate(panel, window).map(TirResult::from_point);
        };

        let mut bootstrap = ClusterBootstrap::new(self.engine.clone(), PercentileBootstrap)
            .with_resamples(n_resamples)
            .with_confidence_level(self.config.confidence_level());
        if let Some(seed) = self.config.seed() {
            bootstrap = bootstrap.with_seed(seed);
        }
        if let Some(token) = &self.cancellation {
            bootstrap = bootstrap.with_cancellation(token.clone());
        }
        bootstrap
            .run(estimator, panel, window)
            .map(TirResult::from_bootstrap)
    }
}

/// Estimate time in range as `config` describes
pub fn estimate_tir(panel: &Panel, config: &TirConfig) -> Result<TirResult> {
    Dispatcher::new(config.clone()).run(panel)
}

/// Estimate time in range, weighting by `model` when the hazard method is selected
pub fn estimate_tir_with_model<M: HazardModel>(
    panel: &Panel,
    config: &TirConfig,
    model: M,
) -> Result<TirResult> {
    Dispatcher::new(config.clone()).run_with_model(panel, model)
}
