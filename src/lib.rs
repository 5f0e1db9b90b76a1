//! opossum-rs: TFBS over-representation analysis in Rust
//!
//! This crate implements the oPOSSUM statistical scoring engine: given
//! precomputed transcription-factor binding-site hit counts for a target
//! gene set and a background gene set, it ranks TF profiles by
//! over-representation using a continuity-corrected z-score and a
//! one-tailed Fisher exact test, with an optional Kolmogorov-Smirnov
//! comparison of site positional distributions.
//!
//! # Example
//!
//! ```ignore
//! use opossum_rs::prelude::*;
//!
//! let background = read_counts_table("background_counts.tsv")?;
//! let target = read_counts_table("target_counts.tsv")?;
//! let tf_info = read_tf_info("tf_info.tsv")?;
//!
//! let inputs = AnalysisInputs {
//!     background: &background,
//!     target: &target,
//!     bg_total_length: 200_000,
//!     t_total_length: 100_000,
//!     tf_widths: &widths_from(&tf_info),
//!     ks: None,
//! };
//! let results = run_analysis(&inputs)?;
//!
//! let list = results.get_list(&ListOptions {
//!     sort_by: Some(SortKey::Zscore),
//!     reverse: true,
//!     ..Default::default()
//! });
//! ```

pub mod cli;
pub mod data;
pub mod error;
pub mod io;
pub mod results;
pub mod scoring;
pub mod stats;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::data::{check_tf_universe, CountsTable, IdRange, Subset, SubsetSpec, ValuesTable};
    pub use crate::error::{OpossumError, Result};
    pub use crate::io::{
        info_map, read_counts_table, read_tf_info, read_values_table, widths_from, write_results,
        write_results_json, TfInfo,
    };
    pub use crate::results::{
        CombinedResultSet, ListOptions, ResultCount, ScoreResult, SortKey,
    };
    pub use crate::scoring::{
        fisher_test, ks_test, ks_test_against, zscore_test, ReferenceDistribution,
    };
    pub use crate::{run_analysis, AnalysisInputs, KsInput};
}

use std::collections::HashMap;

use crate::data::{CountsTable, ValuesTable};
use crate::error::Result;
use crate::results::CombinedResultSet;
use crate::scoring::{fisher_test, ks_test, ks_test_against, zscore_test, ReferenceDistribution};

/// KS analysis input: an empirical background sample or a named distribution
pub enum KsInput<'a> {
    Data {
        background: &'a ValuesTable,
        target: &'a ValuesTable,
    },
    Reference {
        distribution: ReferenceDistribution,
        target: &'a ValuesTable,
    },
}

/// Everything one combined analysis consumes
pub struct AnalysisInputs<'a> {
    pub background: &'a CountsTable,
    pub target: &'a CountsTable,
    pub bg_total_length: u64,
    pub t_total_length: u64,
    pub tf_widths: &'a HashMap<String, u32>,
    pub ks: Option<KsInput<'a>>,
}

/// Run Fisher + z-score (and KS when requested) and combine the results
///
/// A fatal error in one scorer does not prevent the others from completing:
/// the failure is logged and the combined set is assembled from whichever
/// scorers succeeded. An error is returned only when every scorer failed.
pub fn run_analysis(inputs: &AnalysisInputs) -> Result<CombinedResultSet> {
    let mut first_error = None;

    let fisher = match fisher_test(inputs.background, inputs.target) {
        Ok(set) => {
            log::info!("Fisher analysis scored {} TF profiles", set.len());
            Some(set)
        }
        Err(e) => {
            log::error!("Fisher analysis failed: {e}");
            first_error = Some(e);
            None
        }
    };

    let zscore = match zscore_test(
        inputs.background,
        inputs.target,
        inputs.bg_total_length,
        inputs.t_total_length,
        inputs.tf_widths,
    ) {
        Ok(set) => {
            log::info!("Z-score analysis scored {} TF profiles", set.len());
            Some(set)
        }
        Err(e) => {
            log::error!("Z-score analysis failed: {e}");
            first_error.get_or_insert(e);
            None
        }
    };

    let ks = match &inputs.ks {
        None => None,
        Some(input) => {
            let outcome = match input {
                KsInput::Data { background, target } => ks_test(background, target),
                KsInput::Reference {
                    distribution,
                    target,
                } => ks_test_against(distribution, target),
            };
            match outcome {
                Ok(set) => {
                    log::info!("KS analysis scored {} TF profiles", set.len());
                    Some(set)
                }
                Err(e) => {
                    log::error!("KS analysis failed: {e}");
                    first_error.get_or_insert(e);
                    None
                }
            }
        }
    };

    if fisher.is_none() && zscore.is_none() && ks.is_none() {
        // every requested scorer failed; surface the first failure
        return Err(first_error.expect("at least one scorer always runs"));
    }

    Ok(CombinedResultSet::combine(fisher, zscore, ks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ValuesTable;

    fn widths() -> HashMap<String, u32> {
        HashMap::from([("MA0001".to_string(), 8), ("MA0002".to_string(), 12)])
    }

    fn paired_counts() -> (CountsTable, CountsTable) {
        let mut bg = CountsTable::with_ids(
            (0..20).map(|i| format!("bg{i}")),
            ["MA0001", "MA0002"],
        );
        let mut tg =
            CountsTable::with_ids((0..10).map(|i| format!("t{i}")), ["MA0001", "MA0002"]);
        for i in 0..7 {
            tg.set_count(&format!("t{i}"), "MA0001", 2);
        }
        for i in 0..3 {
            bg.set_count(&format!("bg{i}"), "MA0001", 1);
        }
        for i in 0..4 {
            tg.set_count(&format!("t{i}"), "MA0002", 1);
            bg.set_count(&format!("bg{i}"), "MA0002", 1);
        }
        (bg, tg)
    }

    #[test]
    fn test_combined_analysis_populates_both_scores() {
        let (bg, tg) = paired_counts();
        let inputs = AnalysisInputs {
            background: &bg,
            target: &tg,
            bg_total_length: 200_000,
            t_total_length: 100_000,
            tf_widths: &widths(),
            ks: None,
        };
        let results = run_analysis(&inputs).unwrap();
        assert_eq!(results.len(), 2);
        let r = results.get("MA0001").unwrap();
        assert!(r.fisher_score.is_some());
        assert!(r.zscore.is_some());
        assert!(r.ks_score.is_none());
    }

    #[test]
    fn test_ks_failure_does_not_block_other_scorers() {
        let (bg, tg) = paired_counts();
        // mismatched KS universes: the KS scorer fails, the rest proceed
        let mut ks_bg = ValuesTable::new();
        let mut ks_tg = ValuesTable::new();
        ks_bg.append_value("g1", "MA0001", 1.0);
        ks_tg.append_value("g1", "MA0009", 1.0);

        let inputs = AnalysisInputs {
            background: &bg,
            target: &tg,
            bg_total_length: 200_000,
            t_total_length: 100_000,
            tf_widths: &widths(),
            ks: Some(KsInput::Data {
                background: &ks_bg,
                target: &ks_tg,
            }),
        };
        let results = run_analysis(&inputs).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.get("MA0001").unwrap().zscore.is_some());
        assert!(results.iter().all(|r| r.ks_score.is_none()));
    }

    #[test]
    fn test_all_scorers_failing_is_an_error() {
        let mut bg = CountsTable::new();
        let mut tg = CountsTable::new();
        bg.set_count("g1", "MA0001", 1);
        tg.set_count("g1", "MA0002", 1);

        let inputs = AnalysisInputs {
            background: &bg,
            target: &tg,
            bg_total_length: 1000,
            t_total_length: 1000,
            tf_widths: &widths(),
            ks: None,
        };
        assert!(run_analysis(&inputs).is_err());
    }

    #[test]
    fn test_ks_variant_contributes_scores() {
        let (bg, tg) = paired_counts();
        let mut ks_bg = ValuesTable::new();
        let mut ks_tg = ValuesTable::new();
        for tf in ["MA0001", "MA0002"] {
            for i in 0..20 {
                ks_bg.append_value("g1", tf, i as f64 * 10.0);
                ks_tg.append_value("g1", tf, i as f64);
            }
        }

        let inputs = AnalysisInputs {
            background: &bg,
            target: &tg,
            bg_total_length: 200_000,
            t_total_length: 100_000,
            tf_widths: &widths(),
            ks: Some(KsInput::Data {
                background: &ks_bg,
                target: &ks_tg,
            }),
        };
        let results = run_analysis(&inputs).unwrap();
        let r = results.get("MA0001").unwrap();
        assert!(r.ks_score.is_some());
        assert_eq!(r.ks_background.as_deref(), Some("data"));
        assert!(r.fisher_score.is_some());
    }
}
