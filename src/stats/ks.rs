//! Kolmogorov-Smirnov test statistics and asymptotic p-values
//!
//! The two-sample statistic is the maximum distance between the two
//! empirical CDFs, computed with a single merged scan over the sorted
//! samples. P-values use the asymptotic Kolmogorov distribution
//! Q(lambda) = 2 * sum_{k>=1} (-1)^(k-1) exp(-2 k^2 lambda^2)
//! with the Stephens small-sample adjustment
//! lambda = (sqrt(en) + 0.12 + 0.11 / sqrt(en)) * D.

const KOLMOGOROV_SERIES_TERMS: i32 = 100;

fn sorted(sample: &[f64]) -> Vec<f64> {
    let mut s = sample.to_vec();
    s.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    s
}

/// Asymptotic Kolmogorov distribution tail probability
fn kolmogorov_pvalue(lambda: f64) -> f64 {
    // the alternating series degenerates as lambda approaches 0; the tail
    // probability there is 1
    if lambda < 0.1 {
        return 1.0;
    }

    let mut sum = 0.0;
    for k in 1..=KOLMOGOROV_SERIES_TERMS {
        let term = (-1.0_f64).powi(k - 1) * (-2.0 * (k as f64).powi(2) * lambda.powi(2)).exp();
        sum += term;
    }
    (2.0 * sum).clamp(0.0, 1.0)
}

/// Two-sample KS test
///
/// Both samples must be non-empty; callers skip empty samples before
/// reaching this point. Returns (D statistic, p-value).
pub fn ks_two_sample(a: &[f64], b: &[f64]) -> (f64, f64) {
    debug_assert!(!a.is_empty() && !b.is_empty());

    let a_sorted = sorted(a);
    let b_sorted = sorted(b);

    let n_a = a_sorted.len();
    let n_b = b_sorted.len();
    let mut i = 0;
    let mut j = 0;
    let mut cdf_a: f64 = 0.0;
    let mut cdf_b: f64 = 0.0;
    let mut d_max: f64 = 0.0;

    while i < n_a && j < n_b {
        let v_a = a_sorted[i];
        let v_b = b_sorted[j];
        if v_a < v_b {
            cdf_a += 1.0 / n_a as f64;
            i += 1;
        } else if v_b < v_a {
            cdf_b += 1.0 / n_b as f64;
            j += 1;
        } else {
            // step both CDFs past the shared value
            cdf_a += 1.0 / n_a as f64;
            cdf_b += 1.0 / n_b as f64;
            i += 1;
            j += 1;
        }
        d_max = d_max.max((cdf_a - cdf_b).abs());
    }

    let m = n_a as f64;
    let n = n_b as f64;
    let en = (m * n) / (m + n);
    let lambda = (en.sqrt() + 0.12 + 0.11 / en.sqrt()) * d_max;

    (d_max, kolmogorov_pvalue(lambda))
}

/// One-sample KS test against a theoretical CDF
///
/// The sample must be non-empty. Returns (D statistic, p-value).
pub fn ks_one_sample<F>(sample: &[f64], cdf: F) -> (f64, f64)
where
    F: Fn(f64) -> f64,
{
    debug_assert!(!sample.is_empty());

    let s = sorted(sample);
    let n = s.len() as f64;

    let mut d_max: f64 = 0.0;
    for (i, &x) in s.iter().enumerate() {
        let f = cdf(x);
        // distance both above and below the step
        let d_plus = (i as f64 + 1.0) / n - f;
        let d_minus = f - i as f64 / n;
        d_max = d_max.max(d_plus).max(d_minus);
    }

    let lambda = (n.sqrt() + 0.12 + 0.11 / n.sqrt()) * d_max;
    (d_max, kolmogorov_pvalue(lambda))
}
