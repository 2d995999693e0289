//! Covariate formulas
//!
//! A formula lists the covariates entering the hazard model as terms joined
//! by `+`, e.g. `"age + hba1c"`. An empty formula, or one consisting only of
//! the intercept term `1`, selects no covariates.

use std::fmt;
use std::str::FromStr;
use tir_core::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Formula {
    terms: Vec<String>,
}

impl Formula {
    pub fn parse(spec: &str) -> Result<Self> {
        let mut terms: Vec<String> = Vec::new();
        for raw in spec.split('+') {
            let term = raw.trim();
            if term.is_empty() {
                if spec.trim().is_empty() {
                    continue;
                }
                return Err(Error::InvalidParameter(format!(
                    "Formula '{spec}' has an empty term"
                )));
            }
            if term == "1" {
                continue;
            }
            if let Some(op) = term.chars().find(|c| "*:~()-^".contains(*c)) {
                return Err(Error::InvalidParameter(format!(
                    "Formula term '{term}' uses unsupported operator '{op}'"
                )));
            }
            if !terms.iter().any(|t| t == term) {
                terms.push(term.to_string());
            }
        }
        Ok(Self { terms })
    }

    /// A formula over the given covariate names
    pub fn from_terms<I, S>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = terms
            .into_iter()
            .map(|t| t.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" + ");
        Self::parse(&joined)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Column positions of each term among `covariate_names`
    pub fn resolve(&self, covariate_names: &[String]) -> Result<Vec<usize>> {
        self.terms
            .iter()
            .map(|term| {
                covariate_names
                    .iter()
                    .position(|name| name == term)
                    .ok_or_else(|| {
                        Error::InvalidInput(format!(
                            "Formula references unknown covariate '{term}'"
                        ))
                    })
            })
            .collect()
    }
}

impl FromStr for Formula {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            write!(f, "1")
        } else {
            write!(f, "{}", self.terms.join(" + "))
        }
    }
}
