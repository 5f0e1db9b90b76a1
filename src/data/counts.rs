//! TFBS hit counts per (entity, TF) pair for one sample set
//!
//! One `CountsTable` holds the observed binding-site hit counts for either
//! the target or the background set. Counts live in an ordered map keyed by
//! the composite (entity, TF) pair, with explicit membership sets for both
//! dimensions: any ID ever counted becomes part of its membership set, and
//! reads never mutate. Loading code holds the table mutably and calls
//! `set_count`/`add_count`; scorers only ever see `&CountsTable`.

use std::collections::{BTreeMap, BTreeSet};

use crate::data::subset::{select_ids, Subset, SubsetSpec};

/// Per-(entity, TF) hit counts for one sample set
#[derive(Debug, Clone, Default)]
pub struct CountsTable {
    counts: BTreeMap<(String, String), u32>,
    entities: BTreeSet<String>,
    tfs: BTreeSet<String>,
}

impl CountsTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table pre-seeded with zero counts for the full cross-product
    /// of the given entity and TF IDs
    pub fn with_ids<E, T>(entity_ids: E, tf_ids: T) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        let entities: BTreeSet<String> = entity_ids.into_iter().map(Into::into).collect();
        let tfs: BTreeSet<String> = tf_ids.into_iter().map(Into::into).collect();

        let mut counts = BTreeMap::new();
        for entity in &entities {
            for tf in &tfs {
                counts.insert((entity.clone(), tf.clone()), 0);
            }
        }

        Self {
            counts,
            entities,
            tfs,
        }
    }

    /// Record (or overwrite) the hit count for an (entity, TF) pair,
    /// registering both IDs in their membership sets
    pub fn set_count(&mut self, entity_id: &str, tf_id: &str, count: u32) {
        self.entities.insert(entity_id.to_string());
        self.tfs.insert(tf_id.to_string());
        self.counts
            .insert((entity_id.to_string(), tf_id.to_string()), count);
    }

    /// Accumulate onto the existing count for an (entity, TF) pair
    pub fn add_count(&mut self, entity_id: &str, tf_id: &str, count: u32) {
        self.entities.insert(entity_id.to_string());
        self.tfs.insert(tf_id.to_string());
        *self
            .counts
            .entry((entity_id.to_string(), tf_id.to_string()))
            .or_insert(0) += count;
    }

    /// Hit count for an (entity, TF) pair
    ///
    /// An unknown entity or TF reads as 0: "entity with zero counts" and
    /// "entity never mentioned" are deliberately indistinguishable here.
    /// Membership queries exist for callers that need the distinction.
    pub fn get_count(&self, entity_id: &str, tf_id: &str) -> u32 {
        self.counts
            .get(&(entity_id.to_string(), tf_id.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Whether a count was ever recorded for this exact pair
    pub fn has_pair(&self, entity_id: &str, tf_id: &str) -> bool {
        self.counts
            .contains_key(&(entity_id.to_string(), tf_id.to_string()))
    }

    pub fn contains_entity(&self, entity_id: &str) -> bool {
        self.entities.contains(entity_id)
    }

    pub fn contains_tf(&self, tf_id: &str) -> bool {
        self.tfs.contains(tf_id)
    }

    /// Entity IDs in table order
    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(String::as_str)
    }

    /// TF IDs in table order
    pub fn tf_ids(&self) -> impl Iterator<Item = &str> {
        self.tfs.iter().map(String::as_str)
    }

    pub fn num_entities(&self) -> usize {
        self.entities.len()
    }

    pub fn num_tfs(&self) -> usize {
        self.tfs.len()
    }

    /// Total occurrences of a TF summed across all entities
    pub fn total_hits(&self, tf_id: &str) -> u64 {
        self.entities
            .iter()
            .map(|e| self.get_count(e, tf_id) as u64)
            .sum()
    }

    /// Entities with at least one occurrence of a TF
    pub fn entities_with_hit(&self, tf_id: &str) -> Vec<&str> {
        self.entities
            .iter()
            .filter(|e| self.get_count(e, tf_id) > 0)
            .map(String::as_str)
            .collect()
    }

    /// Number of distinct entities with at least one occurrence of a TF
    pub fn gene_hit_count(&self, tf_id: &str) -> usize {
        self.entities
            .iter()
            .filter(|e| self.get_count(e, tf_id) > 0)
            .count()
    }

    /// Produce an independent table restricted to the given entity/TF IDs
    /// and/or ID ranges, reporting requested-but-absent IDs
    ///
    /// Range bounds compare numerically for numeric IDs, but the resulting
    /// table iterates its IDs in byte order like any other table.
    pub fn subset(&self, spec: &SubsetSpec) -> Subset<CountsTable> {
        let (entities, missing_entities) = select_ids(
            &self.entities,
            spec.entity_ids.as_deref(),
            spec.entity_range.as_ref(),
        );
        let (tfs, missing_tfs) =
            select_ids(&self.tfs, spec.tf_ids.as_deref(), spec.tf_range.as_ref());

        let mut table = CountsTable::with_ids(entities.clone(), tfs.clone());
        for entity in &entities {
            for tf in &tfs {
                if self.has_pair(entity, tf) {
                    table.set_count(entity, tf, self.get_count(entity, tf));
                }
            }
        }

        Subset {
            table,
            missing_entities,
            missing_tfs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::subset::IdRange;

    fn sample_table() -> CountsTable {
        let mut t = CountsTable::new();
        t.set_count("gene1", "MA0001", 3);
        t.set_count("gene2", "MA0001", 0);
        t.set_count("gene3", "MA0001", 2);
        t.set_count("gene1", "MA0002", 0);
        t.set_count("gene2", "MA0002", 1);
        t
    }

    #[test]
    fn test_membership_registered_on_set() {
        let t = sample_table();
        assert_eq!(t.num_entities(), 3);
        assert_eq!(t.num_tfs(), 2);
        assert!(t.contains_entity("gene3"));
        assert!(t.contains_tf("MA0002"));
    }

    #[test]
    fn test_unknown_pair_reads_zero() {
        let t = sample_table();
        assert_eq!(t.get_count("gene99", "MA0001"), 0);
        assert_eq!(t.get_count("gene1", "MA0099"), 0);
        assert!(!t.contains_entity("gene99"));
    }

    #[test]
    fn test_zero_count_distinct_from_unrecorded() {
        let t = sample_table();
        assert!(t.has_pair("gene2", "MA0001"));
        assert!(!t.has_pair("gene3", "MA0002"));
        assert_eq!(t.get_count("gene2", "MA0001"), t.get_count("gene3", "MA0002"));
    }

    #[test]
    fn test_total_hits_and_gene_hit_count() {
        let t = sample_table();
        assert_eq!(t.total_hits("MA0001"), 5);
        assert_eq!(t.gene_hit_count("MA0001"), 2);
        assert_eq!(t.entities_with_hit("MA0001"), vec!["gene1", "gene3"]);
        assert_eq!(t.total_hits("MA0002"), 1);
        assert_eq!(t.gene_hit_count("MA0002"), 1);
    }

    #[test]
    fn test_add_count_accumulates() {
        let mut t = CountsTable::new();
        t.add_count("gene1", "MA0001", 2);
        t.add_count("gene1", "MA0001", 3);
        assert_eq!(t.get_count("gene1", "MA0001"), 5);
    }

    #[test]
    fn test_with_ids_seeds_zero_cross_product() {
        let t = CountsTable::with_ids(vec!["g1", "g2"], vec!["t1", "t2", "t3"]);
        assert_eq!(t.num_entities(), 2);
        assert_eq!(t.num_tfs(), 3);
        assert!(t.has_pair("g2", "t3"));
        assert_eq!(t.get_count("g2", "t3"), 0);
    }

    #[test]
    fn test_subset_by_explicit_ids() {
        let t = sample_table();
        let spec = SubsetSpec {
            entity_ids: Some(vec!["gene1".into(), "gene3".into(), "geneX".into()]),
            tf_ids: Some(vec!["MA0001".into()]),
            ..Default::default()
        };
        let sub = t.subset(&spec);
        assert_eq!(sub.table.num_entities(), 2);
        assert_eq!(sub.table.num_tfs(), 1);
        assert_eq!(sub.table.get_count("gene1", "MA0001"), 3);
        assert_eq!(sub.missing_entities, vec!["geneX"]);
        assert!(sub.missing_tfs.is_empty());
    }

    #[test]
    fn test_subset_by_range() {
        let t = sample_table();
        let spec = SubsetSpec {
            entity_range: Some(IdRange::new("gene2", "gene3")),
            ..Default::default()
        };
        let sub = t.subset(&spec);
        assert_eq!(sub.table.num_entities(), 2);
        assert!(!sub.table.contains_entity("gene1"));
        // the full TF set is retained
        assert_eq!(sub.table.num_tfs(), 2);
    }

    #[test]
    fn test_subset_iterates_in_byte_order() {
        let mut t = CountsTable::new();
        for e in ["2", "9", "10"] {
            t.set_count(e, "MA0001", 1);
        }
        // the numeric range selects all three; the subset table itself
        // still iterates IDs in byte order
        let spec = SubsetSpec {
            entity_range: Some(IdRange::new("2", "10")),
            ..Default::default()
        };
        let sub = t.subset(&spec);
        let ids: Vec<&str> = sub.table.entity_ids().collect();
        assert_eq!(ids, vec!["10", "2", "9"]);
    }

    #[test]
    fn test_subset_is_independent() {
        let t = sample_table();
        let mut sub = t.subset(&SubsetSpec::default());
        sub.table.set_count("gene1", "MA0001", 99);
        assert_eq!(t.get_count("gene1", "MA0001"), 3);
    }
}
