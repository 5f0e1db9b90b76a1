//! Per-(entity, TF) numeric observations for positional KS analysis
//!
//! Where `CountsTable` records how many sites were found, `ValuesTable`
//! records one number per site (typically the signed distance between the
//! site and a reference position). Membership bookkeeping matches
//! `CountsTable`; a pair that was never written reads as an empty slice.

use std::collections::{BTreeMap, BTreeSet};

use crate::data::subset::{select_ids, Subset, SubsetSpec};

/// Per-(entity, TF) observation lists for one sample set
#[derive(Debug, Clone, Default)]
pub struct ValuesTable {
    values: BTreeMap<(String, String), Vec<f64>>,
    entities: BTreeSet<String>,
    tfs: BTreeSet<String>,
}

impl ValuesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single observation for an (entity, TF) pair; never
    /// overwrites earlier observations
    pub fn append_value(&mut self, entity_id: &str, tf_id: &str, value: f64) {
        self.entities.insert(entity_id.to_string());
        self.tfs.insert(tf_id.to_string());
        self.values
            .entry((entity_id.to_string(), tf_id.to_string()))
            .or_default()
            .push(value);
    }

    /// Replace the full observation list for an (entity, TF) pair
    pub fn set_values(&mut self, entity_id: &str, tf_id: &str, values: Vec<f64>) {
        self.entities.insert(entity_id.to_string());
        self.tfs.insert(tf_id.to_string());
        self.values
            .insert((entity_id.to_string(), tf_id.to_string()), values);
    }

    /// Observations for a pair, in insertion order; empty for unknown pairs
    pub fn values(&self, entity_id: &str, tf_id: &str) -> &[f64] {
        self.values
            .get(&(entity_id.to_string(), tf_id.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every observation for a TF across all entities, flattened in entity
    /// order. This is the sample handed to the KS test.
    pub fn all_values(&self, tf_id: &str) -> Vec<f64> {
        self.entities
            .iter()
            .flat_map(|e| self.values(e, tf_id).iter().copied())
            .collect()
    }

    pub fn contains_entity(&self, entity_id: &str) -> bool {
        self.entities.contains(entity_id)
    }

    pub fn contains_tf(&self, tf_id: &str) -> bool {
        self.tfs.contains(tf_id)
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(String::as_str)
    }

    pub fn tf_ids(&self) -> impl Iterator<Item = &str> {
        self.tfs.iter().map(String::as_str)
    }

    pub fn num_entities(&self) -> usize {
        self.entities.len()
    }

    pub fn num_tfs(&self) -> usize {
        self.tfs.len()
    }

    /// Produce an independent table restricted to the given entity/TF IDs
    /// and/or ID ranges, reporting requested-but-absent IDs
    ///
    /// Range bounds compare numerically for numeric IDs, but the resulting
    /// table iterates its IDs in byte order like any other table.
    pub fn subset(&self, spec: &SubsetSpec) -> Subset<ValuesTable> {
        let (entities, missing_entities) = select_ids(
            &self.entities,
            spec.entity_ids.as_deref(),
            spec.entity_range.as_ref(),
        );
        let (tfs, missing_tfs) =
            select_ids(&self.tfs, spec.tf_ids.as_deref(), spec.tf_range.as_ref());

        let mut table = ValuesTable::new();
        table.entities = entities.iter().cloned().collect();
        table.tfs = tfs.iter().cloned().collect();
        for entity in &entities {
            for tf in &tfs {
                if let Some(vals) = self.values.get(&(entity.clone(), tf.clone())) {
                    table.values.insert((entity.clone(), tf.clone()), vals.clone());
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
