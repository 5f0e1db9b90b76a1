//! Continuity-corrected z-score for nucleotide-level over-representation
//!
//! Hit counts are converted to nucleotide counts using each TF's profile
//! width, then compared against the rate expected from the background set
//! under a binomial model of the target search space:
//!
//!   Nt = w * Ht          Nb = w * Hb
//!   Rt = Nt / Lt         Rb = Nb / Lb
//!   Ne = Nb * (Lt / Lb)
//!   S  = sqrt(Lt * Rb * (1 - Rb))
//!   Z  = (Nt - Ne - 0.5) / S
//!
//! with a one-sided upper-tail normal p-value. When S is zero (background
//! rate exactly 0 or 1) the z-score and p-value stay absent for that TF;
//! downstream sorting treats them as missing.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::data::{check_tf_universe, CountsTable};
use crate::error::{OpossumError, Result};
use crate::results::{CombinedResultSet, ScoreResult};
use crate::stats::normal_sf;

/// Score every shared TF ID with the continuity-corrected z statistic
///
/// `bg_total_length` / `t_total_length` are the total nucleotides searched
/// in each sample set and must be positive. `tf_widths` must supply the
/// profile footprint width for every shared TF ID.
pub fn zscore_test(
    background: &CountsTable,
    target: &CountsTable,
    bg_total_length: u64,
    t_total_length: u64,
    tf_widths: &HashMap<String, u32>,
) -> Result<CombinedResultSet> {
    check_tf_universe(background.tf_ids(), target.tf_ids())?;

    if bg_total_length == 0 {
        return Err(OpossumError::InvalidSearchLength {
            which: "background".to_string(),
            length: bg_total_length,
        });
    }
    if t_total_length == 0 {
        return Err(OpossumError::InvalidSearchLength {
            which: "target".to_string(),
            length: t_total_length,
        });
    }

    let tf_ids: Vec<&str> = target.tf_ids().collect();
    for &tf_id in &tf_ids {
        if !tf_widths.contains_key(tf_id) {
            return Err(OpossumError::MissingProfileWidth {
                tf_id: tf_id.to_string(),
            });
        }
    }

    let per_tf: Vec<Option<ScoreResult>> = tf_ids
        .par_iter()
        .map(|&tf_id| {
            score_one(
                background,
                target,
                bg_total_length as f64,
                t_total_length as f64,
                tf_widths[tf_id],
                tf_id,
            )
        })
        .collect();

    let mut results = CombinedResultSet::new();
    for result in per_tf.into_iter().flatten() {
        results.insert(result);
    }
    results.set_param("bg_total_length", bg_total_length.to_string());
    results.set_param("target_total_length", t_total_length.to_string());

    Ok(results)
}

fn score_one(
    background: &CountsTable,
    target: &CountsTable,
    bg_len: f64,
    t_len: f64,
    width: u32,
    tf_id: &str,
) -> Option<ScoreResult> {
    if !background.contains_tf(tf_id) {
        log::info!("TF {tf_id} not in background counts; removed from z-score analysis");
        return None;
    }

    let t_hits = target.total_hits(tf_id);
    let bg_hits = background.total_hits(tf_id);

    let nt = width as f64 * t_hits as f64;
    let nb = width as f64 * bg_hits as f64;
    let rt = nt / t_len;
    let rb = nb / bg_len;
    let size_ratio = t_len / bg_len;
    let expected = nb * size_ratio;
    let sd = (t_len * rb * (1.0 - rb)).sqrt();

    let mut result = ScoreResult::new(tf_id);
    result.target_hits = Some(t_hits);
    result.bg_hits = Some(bg_hits);
    result.target_gene_hits = Some(target.gene_hit_count(tf_id) as u64);
    result.bg_gene_hits = Some(background.gene_hit_count(tf_id) as u64);
    result.target_rate = Some(rt);
    result.bg_rate = Some(rb);

    // degenerate background rate: leave z and p absent, not a sentinel
    if sd > 0.0 {
        let z = (nt - expected - 0.5) / sd;
        result.zscore = Some(z);
        result.zscore_pvalue = Some(normal_sf(z));
    }

    Some(result)
}
