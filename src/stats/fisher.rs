//! One-tailed Fisher exact test for 2x2 contingency tables
//!
//! The one-tailed "greater" alternative is the hypergeometric upper tail:
//! with `a` target hits out of `a + b` target entities drawn from a pooled
//! population of `a + b + c + d` entities containing `a + c` hit entities,
//! p = P(X >= a) = sf(a - 1).

use statrs::distribution::{DiscreteCDF, Hypergeometric};

use crate::error::{OpossumError, Result};

/// 2x2 contingency table for one TF
///
/// Rows are target/background, columns are hit/no-hit entity counts.
#[derive(Debug, Clone, Copy)]
pub struct ContingencyTable {
    pub target_hits: u64,
    pub target_no_hits: u64,
    pub bg_hits: u64,
    pub bg_no_hits: u64,
}

impl ContingencyTable {
    fn population(&self) -> u64 {
        self.target_hits + self.target_no_hits + self.bg_hits + self.bg_no_hits
    }
}

/// One-tailed (greater-in-target) Fisher exact probability
pub fn fisher_exact_greater(table: &ContingencyTable) -> Result<f64> {
    let population = table.population();
    if population == 0 {
        return Err(OpossumError::InvalidInput {
            reason: "Fisher exact test on an all-zero table".to_string(),
        });
    }

    // No target hits: P(X >= 0) is 1 by definition
    if table.target_hits == 0 {
        return Ok(1.0);
    }

    let successes = table.target_hits + table.bg_hits;
    let draws = table.target_hits + table.target_no_hits;

    let dist = Hypergeometric::new(population, successes, draws).map_err(|e| {
        OpossumError::InvalidInput {
            reason: format!("invalid hypergeometric parameters: {e}"),
        }
    })?;

    Ok(dist.sf(table.target_hits - 1))
}
