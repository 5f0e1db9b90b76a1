//! Count and observation containers for the scoring engine

mod counts;
mod subset;
mod values;

pub use counts::CountsTable;
pub use subset::{IdRange, Subset, SubsetSpec};
pub use values::ValuesTable;

use crate::error::{OpossumError, Result};

/// Verify that the background and target TF ID universes are identical in
/// membership and order. Every scorer calls this before any per-TF work, so
/// a mismatch never leaves a partially populated result set.
pub fn check_tf_universe<'a, B, T>(background: B, target: T) -> Result<()>
where
    B: Iterator<Item = &'a str>,
    T: Iterator<Item = &'a str>,
{
    let bg: Vec<&str> = background.collect();
    let tg: Vec<&str> = target.collect();

    for (position, (b, t)) in bg.iter().zip(tg.iter()).enumerate() {
        if b != t {
            return Err(OpossumError::TfSetMismatch {
                position,
                background_id: b.to_string(),
                target_id: t.to_string(),
            });
        }
    }

    if bg.len() != tg.len() {
        return Err(OpossumError::TfSetSizeMismatch {
            background_len: bg.len(),
            target_len: tg.len(),
        });
    }

    Ok(())
}
