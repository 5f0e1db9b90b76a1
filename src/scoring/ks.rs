//! Kolmogorov-Smirnov comparison of site positional distributions
//!
//! Tests whether the distances between predicted sites and a reference
//! position differ between the target and background sets (two-sample), or
//! between the target set and a named theoretical distribution
//! (one-sample). A TF with no observations in either sample is omitted;
//! that is expected, not an error.

use std::fmt;
use std::str::FromStr;

use crate::data::{check_tf_universe, ValuesTable};
use crate::error::{OpossumError, Result};
use crate::results::{CombinedResultSet, ScoreResult};
use crate::stats::{ks_one_sample, ks_two_sample, neg_ln_p};

/// Background label recorded when the KS background is an empirical sample
pub const KS_BACKGROUND_DATA: &str = "data";

/// Named reference distribution for the one-sample KS variant
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceDistribution {
    Uniform { min: f64, max: f64 },
}

impl ReferenceDistribution {
    fn cdf(&self, x: f64) -> f64 {
        match self {
            ReferenceDistribution::Uniform { min, max } => {
                ((x - min) / (max - min)).clamp(0.0, 1.0)
            }
        }
    }
}

impl FromStr for ReferenceDistribution {
    type Err = OpossumError;

    /// Parse `uniform` (unit interval) or `uniform:<min>:<max>`
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            ["uniform"] => Ok(ReferenceDistribution::Uniform { min: 0.0, max: 1.0 }),
            ["uniform", min, max] => {
                let min: f64 = min.parse().map_err(|_| OpossumError::UnknownDistribution {
                    name: s.to_string(),
                })?;
                let max: f64 = max.parse().map_err(|_| OpossumError::UnknownDistribution {
                    name: s.to_string(),
                })?;
                if !(min < max) {
                    return Err(OpossumError::InvalidInput {
                        reason: format!("uniform range must have min < max, got {min}..{max}"),
                    });
                }
                Ok(ReferenceDistribution::Uniform { min, max })
            }
            _ => Err(OpossumError::UnknownDistribution {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ReferenceDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceDistribution::Uniform { min, max } => write!(f, "uniform:{min}:{max}"),
        }
    }
}

/// Two-sample KS scoring of target vs background positional observations
pub fn ks_test(background: &ValuesTable, target: &ValuesTable) -> Result<CombinedResultSet> {
    check_tf_universe(background.tf_ids(), target.tf_ids())?;

    let mut results = CombinedResultSet::new();
    for tf_id in target.tf_ids() {
        let t_sample = target.all_values(tf_id);
        let bg_sample = background.all_values(tf_id);
        if t_sample.is_empty() || bg_sample.is_empty() {
            log::info!("TF {tf_id} has no positional observations in one sample; skipped by KS");
            continue;
        }

        let (_, p) = ks_two_sample(&bg_sample, &t_sample);
        let mut result = ScoreResult::new(tf_id);
        result.ks_score = Some(neg_ln_p(p));
        result.ks_background = Some(KS_BACKGROUND_DATA.to_string());
        results.insert(result);
    }

    Ok(results)
}

/// One-sample KS scoring of target observations against a named distribution
pub fn ks_test_against(
    reference: &ReferenceDistribution,
    target: &ValuesTable,
) -> Result<CombinedResultSet> {
    let mut results = CombinedResultSet::new();
    for tf_id in target.tf_ids() {
        let sample = target.all_values(tf_id);
        if sample.is_empty() {
            log::info!("TF {tf_id} has no positional observations; skipped by KS");
            continue;
        }

        let (_, p) = ks_one_sample(&sample, |x| reference.cdf(x));
        let mut result = ScoreResult::new(tf_id);
        result.ks_score = Some(neg_ln_p(p));
        result.ks_background = Some(reference.to_string());
        results.insert(result);
    }

    Ok(results)
}
