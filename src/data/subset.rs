//! Subset selection for counts and values tables
//!
//! A subset is described by explicit ID lists and/or inclusive ID ranges.
//! Requested IDs that do not exist in the source table are reported back to
//! the caller rather than silently dropped; range bounds outside the
//! available IDs clamp to whatever is present.

use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Inclusive ID range for subset selection
#[derive(Debug, Clone)]
pub struct IdRange {
    pub start: String,
    pub end: String,
}

impl IdRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Specification of a table subset
///
/// `None` for a dimension means "keep everything". When both an explicit
/// list and a range are given for the same dimension, the list is applied
/// first and the range then filters it.
#[derive(Debug, Clone, Default)]
pub struct SubsetSpec {
    pub entity_ids: Option<Vec<String>>,
    pub tf_ids: Option<Vec<String>>,
    pub entity_range: Option<IdRange>,
    pub tf_range: Option<IdRange>,
}

/// A subsetted table together with the requested-but-absent IDs
#[derive(Debug, Clone)]
pub struct Subset<T> {
    pub table: T,
    pub missing_entities: Vec<String>,
    pub missing_tfs: Vec<String>,
}

/// Compare two IDs: numeric IDs sort numerically ("9" < "10") as a block
/// before all non-numeric IDs, which sort lexicographically among
/// themselves. Keying on (is-numeric, value) keeps the order total in a
/// universe that mixes the two kinds.
pub(crate) fn id_cmp(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(na), Ok(nb)) => na.cmp(&nb),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn in_range(id: &str, range: &IdRange) -> bool {
    id_cmp(id, &range.start) != Ordering::Less && id_cmp(id, &range.end) != Ordering::Greater
}

/// Select IDs from a membership set according to an explicit list and/or a
/// range. Returns the selected IDs (in the set's order) and any explicitly
/// requested IDs that were not found.
pub(crate) fn select_ids(
    universe: &BTreeSet<String>,
    explicit: Option<&[String]>,
    range: Option<&IdRange>,
) -> (Vec<String>, Vec<String>) {
    let mut missing = Vec::new();

    let mut selected: Vec<String> = match explicit {
        Some(requested) => {
            let wanted: BTreeSet<&str> = requested
                .iter()
                .map(|id| {
                    if !universe.contains(id) {
                        missing.push(id.clone());
                    }
                    id.as_str()
                })
                .collect();
            universe
                .iter()
                .filter(|id| wanted.contains(id.as_str()))
                .cloned()
                .collect()
        }
        None => universe.iter().cloned().collect(),
    };

    if let Some(r) = range {
        selected.retain(|id| in_range(id, r));
    }
    selected.sort_by(|a, b| id_cmp(a, b));

    (selected, missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_numeric_range_ordering() {
        // "9" < "10" under numeric comparison, the opposite lexicographically
        let u = universe(&["2", "9", "10", "100"]);
        let (sel, missing) = select_ids(&u, None, Some(&IdRange::new("9", "100")));
        assert_eq!(sel, vec!["9", "10", "100"]);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_range_clamps_out_of_bounds() {
        let u = universe(&["5", "6", "7"]);
        let (sel, _) = select_ids(&u, None, Some(&IdRange::new("1", "1000")));
        assert_eq!(sel.len(), 3);
    }

    #[test]
    fn test_missing_ids_reported() {
        let u = universe(&["MA0001", "MA0002"]);
        let requested = vec!["MA0001".to_string(), "MA0099".to_string()];
        let (sel, missing) = select_ids(&u, Some(&requested), None);
        assert_eq!(sel, vec!["MA0001"]);
        assert_eq!(missing, vec!["MA0099"]);
    }

    #[test]
    fn test_mixed_universe_order_is_total() {
        // numeric and suffixed IDs together: every adjacent pair of the
        // selection must satisfy the comparator itself
        let mut ids: Vec<String> = (1..=60).map(|i| i.to_string()).collect();
        ids.extend((1..=60).map(|i| format!("{i}a")));
        let u: BTreeSet<String> = ids.into_iter().collect();

        let (sel, missing) = select_ids(&u, None, None);
        assert_eq!(sel.len(), 120);
        assert!(missing.is_empty());
        for pair in sel.windows(2) {
            assert_ne!(
                id_cmp(&pair[0], &pair[1]),
                Ordering::Greater,
                "output not sorted: {} before {}",
                pair[0],
                pair[1]
            );
        }
        // numeric IDs form one block ahead of the non-numeric block
        assert_eq!(sel[0], "1");
        assert_eq!(sel[59], "60");
        assert_eq!(sel[60], "10a");
    }

    #[test]
    fn test_range_over_mixed_universe() {
        let u = universe(&["2", "9", "10", "1a", "2a"]);
        let (sel, _) = select_ids(&u, None, Some(&IdRange::new("9", "10")));
        assert_eq!(sel, vec!["9", "10"]);
    }

    #[test]
    fn test_list_then_range() {
        let u = universe(&["1", "2", "3", "4"]);
        let requested = vec!["1".to_string(), "3".to_string(), "4".to_string()];
        let (sel, _) = select_ids(&u, Some(&requested), Some(&IdRange::new("2", "3")));
        assert_eq!(sel, vec!["3"]);
    }
}
