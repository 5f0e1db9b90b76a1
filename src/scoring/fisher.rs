//! One-tailed Fisher exact test over paired target/background counts
//!
//! For each TF the gene-level 2x2 table is: entities with >= 1 hit vs
//! entities without, in the target and background sets. The one-tailed
//! (greater-in-target) exact probability is reported as -ln(p) so that
//! larger scores mean stronger over-representation, consistent with the
//! z-score sort direction.

use rayon::prelude::*;

use crate::data::{check_tf_universe, CountsTable};
use crate::error::{OpossumError, Result};
use crate::results::{CombinedResultSet, ScoreResult};
use crate::stats::{fisher_exact_greater, neg_ln_p, ContingencyTable};

/// Score every shared TF ID with the one-tailed Fisher exact test
///
/// Background and target must have identical TF ID universes. A TF absent
/// from the background table is dropped from the analysis with an info log,
/// never an error.
pub fn fisher_test(background: &CountsTable, target: &CountsTable) -> Result<CombinedResultSet> {
    check_tf_universe(background.tf_ids(), target.tf_ids())?;

    if background.num_entities() == 0 || target.num_entities() == 0 {
        return Err(OpossumError::EmptyData {
            reason: "Fisher test requires at least one entity in each sample set".to_string(),
        });
    }

    let tf_ids: Vec<&str> = target.tf_ids().collect();

    let per_tf: Vec<Option<ScoreResult>> = tf_ids
        .par_iter()
        .map(|&tf_id| score_one(background, target, tf_id))
        .collect::<Result<Vec<_>>>()?;

    let mut results = CombinedResultSet::new();
    for result in per_tf.into_iter().flatten() {
        results.insert(result);
    }

    Ok(results)
}

fn score_one(
    background: &CountsTable,
    target: &CountsTable,
    tf_id: &str,
) -> Result<Option<ScoreResult>> {
    if !background.contains_tf(tf_id) {
        log::info!("TF {tf_id} not in background counts; removed from Fisher analysis");
        return Ok(None);
    }

    let target_hits = target.gene_hit_count(tf_id) as u64;
    let target_no_hits = target.num_entities() as u64 - target_hits;
    let bg_hits = background.gene_hit_count(tf_id) as u64;
    let bg_no_hits = background.num_entities() as u64 - bg_hits;

    let table = ContingencyTable {
        target_hits,
        target_no_hits,
        bg_hits,
        bg_no_hits,
    };
    let p = fisher_exact_greater(&table)?;

    let mut result = ScoreResult::new(tf_id);
    result.target_gene_hits = Some(target_hits);
    result.target_gene_no_hits = Some(target_no_hits);
    result.bg_gene_hits = Some(bg_hits);
    result.bg_gene_no_hits = Some(bg_no_hits);
    result.fisher_score = Some(neg_ln_p(p));

    Ok(Some(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paired_tables() -> (CountsTable, CountsTable) {
        let mut bg = CountsTable::with_ids(
            (0..20).map(|i| format!("bg_gene{i}")),
            ["MA0001", "MA0002"],
        );
        let mut tg = CountsTable::with_ids(
            (0..10).map(|i| format!("t_gene{i}")),
            ["MA0001", "MA0002"],
        );

        // MA0001 enriched in target: 8/10 vs 2/20
        for i in 0..8 {
            tg.set_count(&format!("t_gene{i}"), "MA0001", 1);
        }
        for i in 0..2 {
            bg.set_count(&format!("bg_gene{i}"), "MA0001", 1);
        }

        // MA0002 at matching rates: 3/10 vs 6/20
        for i in 0..3 {
            tg.set_count(&format!("t_gene{i}"), "MA0002", 1);
        }
        for i in 0..6 {
            bg.set_count(&format!("bg_gene{i}"), "MA0002", 1);
        }

        (bg, tg)
    }

    #[test]
    fn test_mismatched_universe_rejected() {
        let mut bg = CountsTable::new();
        let mut tg = CountsTable::new();
        bg.set_count("g1", "MA0001", 1);
        tg.set_count("g1", "MA0002", 1);
        assert!(fisher_test(&bg, &tg).is_err());
    }

    #[test]
    fn test_result_per_shared_tf() {
        let (bg, tg) = paired_tables();
        let results = fisher_test(&bg, &tg).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.get("MA0001").is_some());
        assert!(results.get("MA0002").is_some());
    }

    #[test]
    fn test_enriched_tf_outranks_neutral() {
        let (bg, tg) = paired_tables();
        let results = fisher_test(&bg, &tg).unwrap();
        let enriched = results.get("MA0001").unwrap().fisher_score.unwrap();
        let neutral = results.get("MA0002").unwrap().fisher_score.unwrap();
        assert!(enriched > neutral);
        // matching rates should be clearly non-significant
        assert!(neutral < 1.5, "neutral score unexpectedly high: {neutral}");
    }

    #[test]
    fn test_counts_carried_for_reporting() {
        let (bg, tg) = paired_tables();
        let results = fisher_test(&bg, &tg).unwrap();
        let r = results.get("MA0001").unwrap();
        assert_eq!(r.target_gene_hits, Some(8));
        assert_eq!(r.target_gene_no_hits, Some(2));
        assert_eq!(r.bg_gene_hits, Some(2));
        assert_eq!(r.bg_gene_no_hits, Some(18));
    }

    #[test]
    fn test_all_zero_counts_still_scored() {
        let bg = CountsTable::with_ids(vec!["g1", "g2"], vec!["MA0001"]);
        let tg = CountsTable::with_ids(vec!["h1", "h2"], vec!["MA0001"]);
        let results = fisher_test(&bg, &tg).unwrap();
        let r = results.get("MA0001").unwrap();
        // no hits anywhere: p = 1, score = 0
        assert_eq!(r.fisher_score, Some(0.0));
    }

    #[test]
    fn test_score_round_trips_to_probability() {
        let (bg, tg) = paired_tables();
        let results = fisher_test(&bg, &tg).unwrap();
        for r in results.iter() {
            let p = (-r.fisher_score.unwrap()).exp();
            assert!((0.0..=1.0).contains(&p));
        }
    }
}
