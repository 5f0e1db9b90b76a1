//! Per-TF statistical scorers

mod fisher;
mod ks;
mod zscore;

pub use fisher::fisher_test;
pub use ks::{ks_test, ks_test_against, ReferenceDistribution, KS_BACKGROUND_DATA};
pub use zscore::zscore_test;
