//! Statistical primitives shared across the scorers

mod fisher;
mod ks;
mod normal;

pub use fisher::{fisher_exact_greater, ContingencyTable};
pub use ks::{ks_one_sample, ks_two_sample};
pub use normal::normal_sf;

/// Convert a probability in (0, 1] to the -ln score used for ranking
///
/// Higher score means more significant. Probabilities that underflow to
/// exactly 0 are clamped to the smallest positive double so every emitted
/// score is finite and `exp(-score)` recovers a valid probability.
pub fn neg_ln_p(p: f64) -> f64 {
    -p.max(f64::MIN_POSITIVE).ln()
}
