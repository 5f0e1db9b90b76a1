//! Normal-distribution tail probabilities

use statrs::distribution::{ContinuousCDF, Normal};

/// One-sided upper-tail p-value from a z-statistic: P(Z > z)
pub fn normal_sf(z: f64) -> f64 {
    if !z.is_finite() {
        return f64::NAN;
    }

    let normal = Normal::new(0.0, 1.0).unwrap();
    // P(Z > z) = cdf(-z) by symmetry; avoids 1 - cdf(z) cancellation
    normal.cdf(-z)
}
