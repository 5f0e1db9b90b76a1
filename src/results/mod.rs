//! Combined scoring results: one record per TF/cluster ID
//!
//! Each scorer produces a `CombinedResultSet` populated with its own fields;
//! `CombinedResultSet::combine` joins them by TF ID into one record set that
//! the reporting layer consumes through `get_list`.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{OpossumError, Result};

/// Scores and supporting counts for one TF/cluster ID
///
/// Fields are populated by whichever scorers ran; `None` means "not
/// computed", which reporting layers must keep distinct from a computed
/// value of zero.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoreResult {
    /// TF or TF-cluster ID
    pub id: String,
    /// Total site hits in the target set
    pub target_hits: Option<u64>,
    /// Total site hits in the background set
    pub bg_hits: Option<u64>,
    /// Target entities with at least one hit
    pub target_gene_hits: Option<u64>,
    /// Background entities with at least one hit
    pub bg_gene_hits: Option<u64>,
    /// Target entities with no hits
    pub target_gene_no_hits: Option<u64>,
    /// Background entities with no hits
    pub bg_gene_no_hits: Option<u64>,
    /// Target nucleotide rate (site nucleotides / total searched)
    pub target_rate: Option<f64>,
    /// Background nucleotide rate
    pub bg_rate: Option<f64>,
    /// Continuity-corrected z statistic
    pub zscore: Option<f64>,
    /// One-sided upper-tail p-value for the z statistic
    pub zscore_pvalue: Option<f64>,
    /// Fisher score, -ln(one-tailed exact p)
    pub fisher_score: Option<f64>,
    /// KS score, -ln(p)
    pub ks_score: Option<f64>,
    /// Which background distribution the KS test used ("data" for an
    /// empirical sample, otherwise the named distribution)
    pub ks_background: Option<String>,
}

impl ScoreResult {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Fill any unset field from `other` (existing values win)
    fn merge_from(&mut self, other: &ScoreResult) {
        macro_rules! take_missing {
            ($($field:ident),*) => {
                $(if self.$field.is_none() {
                    self.$field = other.$field.clone();
                })*
            };
        }
        take_missing!(
            target_hits,
            bg_hits,
            target_gene_hits,
            bg_gene_hits,
            target_gene_no_hits,
            bg_gene_no_hits,
            target_rate,
            bg_rate,
            zscore,
            zscore_pvalue,
            fisher_score,
            ks_score,
            ks_background
        );
    }
}

/// Sort key for `get_list`
///
/// An explicit enumeration resolved once at call time; numeric keys sort
/// numerically, with missing values always after all defined values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Zscore,
    ZscorePvalue,
    FisherScore,
    KsScore,
    TargetHits,
    BgHits,
    TargetGeneHits,
    BgGeneHits,
}

impl SortKey {
    /// Numeric accessor for this key; `None` for the ID key
    fn numeric(&self, r: &ScoreResult) -> Option<f64> {
        match self {
            SortKey::Id => None,
            SortKey::Zscore => r.zscore,
            SortKey::ZscorePvalue => r.zscore_pvalue,
            SortKey::FisherScore => r.fisher_score,
            SortKey::KsScore => r.ks_score,
            SortKey::TargetHits => r.target_hits.map(|v| v as f64),
            SortKey::BgHits => r.bg_hits.map(|v| v as f64),
            SortKey::TargetGeneHits => r.target_gene_hits.map(|v| v as f64),
            SortKey::BgGeneHits => r.bg_gene_hits.map(|v| v as f64),
        }
    }
}

impl FromStr for SortKey {
    type Err = OpossumError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Ok(SortKey::Id),
            "zscore" | "z_score" => Ok(SortKey::Zscore),
            "zscore_pvalue" | "zscore_p_value" => Ok(SortKey::ZscorePvalue),
            "fisher_score" | "fisher_p_value" => Ok(SortKey::FisherScore),
            "ks_score" | "ks_p_value" => Ok(SortKey::KsScore),
            "target_hits" | "t_hits" => Ok(SortKey::TargetHits),
            "bg_hits" => Ok(SortKey::BgHits),
            "target_gene_hits" | "t_gene_hits" => Ok(SortKey::TargetGeneHits),
            "bg_gene_hits" => Ok(SortKey::BgGeneHits),
            other => Err(OpossumError::UnsupportedSortField {
                field: other.to_string(),
            }),
        }
    }
}

/// Number of results to keep after sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultCount {
    #[default]
    All,
    Top(usize),
}

impl FromStr for ResultCount {
    type Err = OpossumError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(ResultCount::All);
        }
        match s.parse::<usize>() {
            Ok(n) if n > 0 => Ok(ResultCount::Top(n)),
            _ => Err(OpossumError::InvalidInput {
                reason: format!("num_results must be a positive integer or 'all', got '{s}'"),
            }),
        }
    }
}

/// Sorting and filtering options for `get_list`
///
/// Cutoffs apply before truncation. Filtering is lossy: the returned list
/// is an independent object and excluded records are not recoverable from
/// it under a different sort key.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub sort_by: Option<SortKey>,
    pub reverse: bool,
    pub num_results: ResultCount,
    /// Retain only results with z-score >= cutoff
    pub zscore_cutoff: Option<f64>,
    /// Retain only results with Fisher score (-ln p) >= cutoff
    pub fisher_cutoff: Option<f64>,
}

/// Sortable, filterable collection of `ScoreResult` keyed by TF ID
#[derive(Debug, Clone, Default)]
pub struct CombinedResultSet {
    results: BTreeMap<String, ScoreResult>,
    params: BTreeMap<String, String>,
}

impl CombinedResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result, merging field-wise if the ID is already present
    pub fn insert(&mut self, result: ScoreResult) {
        match self.results.entry(result.id.clone()) {
            std::collections::btree_map::Entry::Occupied(mut e) => {
                e.get_mut().merge_from(&result)
            }
            std::collections::btree_map::Entry::Vacant(e) => {
                e.insert(result);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&ScoreResult> {
        self.results.get(id)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.results.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoreResult> {
        self.results.values()
    }

    /// Attach a named reporting parameter (e.g. total searched lengths)
    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Join per-scorer result sets by TF ID
    ///
    /// A TF present in any input appears exactly once in the output with
    /// whichever fields were supplied; no ID is invented or dropped. TFs
    /// with a background site count of exactly 0 are flagged, since a zero
    /// background rate makes the significance estimate maximally (and
    /// perhaps spuriously) large.
    pub fn combine(
        fisher: Option<CombinedResultSet>,
        zscore: Option<CombinedResultSet>,
        ks: Option<CombinedResultSet>,
    ) -> CombinedResultSet {
        let mut combined = CombinedResultSet::new();

        for set in [fisher, zscore, ks].into_iter().flatten() {
            for (key, value) in &set.params {
                combined.params.insert(key.clone(), value.clone());
            }
            for result in set.results.into_values() {
                combined.insert(result);
            }
        }

        for result in combined.results.values() {
            if result.bg_hits == Some(0) || result.bg_gene_hits == Some(0) {
                log::warn!(
                    "TF {} has no background hits; its significance estimate may be spurious",
                    result.id
                );
            }
        }

        combined
    }

    /// Produce the sorted, filtered result list
    ///
    /// Cutoff filtering applies first, then `num_results` truncates the
    /// sorted list. Default sort key is the TF ID; numeric keys sort
    /// numerically with missing values after all defined values (in either
    /// direction) and ties broken by ID.
    pub fn get_list(&self, options: &ListOptions) -> Vec<ScoreResult> {
        let mut list: Vec<ScoreResult> = self
            .results
            .values()
            .filter(|r| match options.zscore_cutoff {
                Some(cutoff) => r.zscore.is_some_and(|z| z >= cutoff),
                None => true,
            })
            .filter(|r| match options.fisher_cutoff {
                Some(cutoff) => r.fisher_score.is_some_and(|f| f >= cutoff),
                None => true,
            })
            .cloned()
            .collect();

        let key = options.sort_by.unwrap_or(SortKey::Id);
        list.sort_by(|a, b| compare_results(a, b, key, options.reverse));

        if let ResultCount::Top(n) = options.num_results {
            list.truncate(n);
        }

        list
    }
}

fn compare_results(a: &ScoreResult, b: &ScoreResult, key: SortKey, reverse: bool) -> Ordering {
    if key == SortKey::Id {
        let ord = a.id.cmp(&b.id);
        return if reverse { ord.reverse() } else { ord };
    }

    match (key.numeric(a), key.numeric(b)) {
        (Some(va), Some(vb)) => {
            let ord = va.partial_cmp(&vb).unwrap_or(Ordering::Equal);
            let ord = if reverse { ord.reverse() } else { ord };
            // deterministic tie-break by ID
            ord.then_with(|| a.id.cmp(&b.id))
        }
        // missing values sort after all defined values regardless of direction
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    }
}
