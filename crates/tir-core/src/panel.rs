//! Subject-time panel data model
//!
//! A [`Panel`] holds every [`Subject`] of a study, each with its
//! [`Observation`]s ordered by time. Subjects are identified by a structured
//! [`SubjectId`]: the original label plus the draw ranks assigned by cluster
//! resampling, so repeated draws of one subject never collide with each
//! other or with any other label.

use crate::range::{TargetRange, TimeWindow};
use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Identifier of a (possibly resampled) subject
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectId {
    label: Arc<str>,
    draws: Vec<u32>,
}

impl SubjectId {
    pub fn new(label: impl Into<Arc<str>>) -> Self {
        Self {
            label: label.into(),
            draws: Vec::new(),
        }
    }

    /// Identifier of the `rank`-th draw (1-based) of this subject in a resample
    pub fn resampled(&self, rank: u32) -> Self {
        let mut draws = self.draws.clone();
        draws.push(rank);
        Self {
            label: Arc::clone(&self.label),
            draws,
        }
    }

    /// The label the subject carried in the source data
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Draw ranks, outermost resample last. Empty for an original subject.
    pub fn draws(&self) -> &[u32] {
        &self.draws
    }

    pub fn is_resampled(&self) -> bool {
        !self.draws.is_empty()
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        for rank in &self.draws {
            write!(f, " [draw {rank}]")?;
        }
        Ok(())
    }
}

impl From<&str> for SubjectId {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for SubjectId {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

/// One measurement of one subject
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Offset since enrollment
    pub time: f64,
    /// The monitored quantity
    pub value: f64,
    /// Derived in-range indicator
    pub in_range: bool,
    /// True only on the subject's last row by time
    pub event: bool,
    /// Stop of the half-open interval `[time, interval_stop)`
    pub interval_stop: f64,
    /// Covariate values, aligned with [`Panel::covariate_names`]
    pub covariates: Vec<f64>,
}

impl Observation {
    /// A raw observation before row features are derived
    pub fn new(time: f64, value: f64, covariates: Vec<f64>) -> Self {
        Self {
            time,
            value,
            in_range: false,
            event: false,
            interval_stop: time,
            covariates,
        }
    }

    /// The in-range indicator as a number
    #[inline]
    pub fn indicator(&self) -> f64 {
        if self.in_range {
            1.0
        } else {
            0.0
        }
    }
}

/// A subject and its time-ordered observations
///
/// Observations are shared behind an `Arc` so resampled panels copy
/// subjects without copying rows.
#[derive(Debug, Clone)]
pub struct Subject {
    id: SubjectId,
    observations: Arc<[Observation]>,
}

impl Subject {
    /// Create a subject, sorting observations by time (stable)
    pub fn new(id: SubjectId, mut observations: Vec<Observation>) -> Result<Self> {
        if observations.is_empty() {
            return Err(Error::EmptySubject(id.to_string()));
        }
        observations.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(Self {
            id,
            observations: observations.into(),
        })
    }

    pub fn id(&self) -> &SubjectId {
        &self.id
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// The same rows under another identifier
    pub fn relabelled(&self, id: SubjectId) -> Self {
        Self {
            id,
            observations: Arc::clone(&self.observations),
        }
    }

    pub(crate) fn with_observations(&self, observations: Vec<Observation>) -> Self {
        Self {
            id: self.id.clone(),
            observations: observations.into(),
        }
    }
}

/// Settings used when row features were derived for a panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSpec {
    pub range: TargetRange,
    pub period: f64,
}

/// A raw input row, as read from a table
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub subject: String,
    pub time: f64,
    pub value: f64,
    pub covariates: Vec<f64>,
}

impl Record {
    pub fn new(subject: impl Into<String>, time: f64, value: f64) -> Self {
        Self {
            subject: subject.into(),
            time,
            value,
            covariates: Vec::new(),
        }
    }

    pub fn with_covariates(mut self, covariates: Vec<f64>) -> Self {
        self.covariates = covariates;
        self
    }
}

/// The full subject-time panel
#[derive(Debug, Clone)]
pub struct Panel {
    covariate_names: Arc<[String]>,
    subjects: Vec<Subject>,
    features: Option<FeatureSpec>,
}

impl Panel {
    /// Build a panel from subjects, validating covariate widths
    pub fn from_subjects(covariate_names: Vec<String>, subjects: Vec<Subject>) -> Result<Self> {
        let width = covariate_names.len();
        for subject in &subjects {
            for obs in subject.observations() {
                if obs.covariates.len() != width {
                    return Err(Error::size_mismatch(
                        width,
                        obs.covariates.len(),
                        &format!("covariates of subject '{}'", subject.id()),
                    ));
                }
            }
        }
        Ok(Self {
            covariate_names: covariate_names.into(),
            subjects,
            features: None,
        })
    }

    /// Group raw records by subject label in order of first appearance
    pub fn from_records<I>(covariate_names: Vec<String>, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut grouped: Vec<(String, Vec<Observation>)> = Vec::new();

        for record in records {
            if !record.time.is_finite() || record.time < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "Subject '{}' has invalid time {}; times must be finite and non-negative",
                    record.subject, record.time
                )));
            }
            if !record.value.is_finite() {
                return Err(Error::InvalidInput(format!(
                    "Subject '{}' has non-finite value at time {}",
                    record.subject, record.time
                )));
            }
            let obs = Observation::new(record.time, record.value, record.covariates);
            match index.get(&record.subject) {
                Some(&slot) => grouped[slot].1.push(obs),
                None => {
                    index.insert(record.subject.clone(), grouped.len());
                    grouped.push((record.subject, vec![obs]));
                }
            }
        }

        let subjects = grouped
            .into_iter()
            .map(|(label, observations)| Subject::new(SubjectId::new(label), observations))
            .collect::<Result<Vec<_>>>()?;

        Self::from_subjects(covariate_names, subjects)
    }

    /// A panel over other subjects sharing this panel's covariates and features
    pub fn with_subjects(&self, subjects: Vec<Subject>) -> Self {
        Self {
            covariate_names: Arc::clone(&self.covariate_names),
            subjects,
            features: self.features,
        }
    }

    pub(crate) fn with_features(
        &self,
        subjects: Vec<Subject>,
        features: FeatureSpec,
    ) -> Self {
        Self {
            covariate_names: Arc::clone(&self.covariate_names),
            subjects,
            features: Some(features),
        }
    }

    /// Only the rows inside `window`, dropping subjects left without rows
    ///
    /// Derived row features are kept as they were computed on the full
    /// follow-up.
    pub fn restricted_to(&self, window: &TimeWindow) -> Self {
        let subjects = self
            .subjects
            .iter()
            .filter_map(|subject| {
                let inside: Vec<Observation> = subject
                    .observations()
                    .iter()
                    .filter(|o| window.contains(o.time))
                    .cloned()
                    .collect();
                (!inside.is_empty()).then(|| subject.with_observations(inside))
            })
            .collect();
        Self {
            covariate_names: Arc::clone(&self.covariate_names),
            subjects,
            features: self.features,
        }
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn n_subjects(&self) -> usize {
        self.subjects.len()
    }

    pub fn n_observations(&self) -> usize {
        self.subjects.iter().map(|s| s.observations().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn covariate_names(&self) -> &[String] {
        &self.covariate_names
    }

    pub fn covariate_index(&self, name: &str) -> Option<usize> {
        self.covariate_names.iter().position(|n| n == name)
    }

    /// Row features, if they have been derived
    pub fn features(&self) -> Option<&FeatureSpec> {
        self.features.as_ref()
    }

    /// Fail unless row features have been derived
    pub fn require_features(&self) -> Result<&FeatureSpec> {
        self.features.as_ref().ok_or_else(|| {
            Error::InvalidInput(
                "Panel has no derived row features; call derive_row_features first".to_string(),
            )
        })
    }

    /// Every observation paired with its subject
    pub fn observations(&self) -> impl Iterator<Item = (&SubjectId, &Observation)> {
        self.subjects
            .iter()
            .flat_map(|s| s.observations().iter().map(move |obs| (s.id(), obs)))
    }
}
