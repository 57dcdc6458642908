//! Statistics primitives: Pearson correlation and least-squares regression.
//!
//! Both functions degrade to a neutral zero result instead of failing, so
//! callers never have to handle errors for empty or mismatched series.

use serde::Serialize;

/// Result of an ordinary least squares fit `y = intercept + slope · x`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination. NaN when `y` has no spread but the fit
    /// leaves a residual; such models are never selected.
    pub r_squared: f64,
}

/// Centered co-moments shared by both estimators.
///
/// `sxy = Σ(x − x̄)(y − ȳ)` equals `(nΣxy − ΣxΣy) / n`, so the ratios below
/// are the textbook sum-of-products formulas without the cancellation they
/// suffer when values sit far from zero.
struct Moments {
    mean_x: f64,
    mean_y: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

impl Moments {
    fn new(x: &[f64], y: &[f64]) -> Self {
        let n = x.len() as f64;
        let mean_x = x.iter().sum::<f64>() / n;
        let mean_y = y.iter().sum::<f64>() / n;

        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for (xi, yi) in x.iter().zip(y) {
            let dx = xi - mean_x;
            let dy = yi - mean_y;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }

        Self {
            mean_x,
            mean_y,
            sxx,
            syy,
            sxy,
        }
    }
}

/// Every value equal to the first. Exact comparison: a constant like 0.1 is
/// constant even though its running sum is not a multiple of 0.1.
fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

/// Pearson correlation coefficient.
///
/// Formula: r = (nΣxy − ΣxΣy) / sqrt((nΣx² − (Σx)²)(nΣy² − (Σy)²)),
/// evaluated on centered values.
///
/// Returns 0 for empty or mismatched series and when either side has zero
/// variance.
pub fn correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() || x.len() != y.len() || is_constant(x) || is_constant(y) {
        return 0.0;
    }

    let m = Moments::new(x, y);
    let denominator = (m.sxx * m.syy).sqrt();

    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        (m.sxy / denominator).clamp(-1.0, 1.0)
    }
}

/// Ordinary least squares fit of `y` on `x`.
///
/// Needs at least two points of equal-length series and some spread in `x`;
/// otherwise returns the all-zero [`Regression`].
pub fn linear_regression(x: &[f64], y: &[f64]) -> Regression {
    if x.len() < 2 || x.len() != y.len() || is_constant(x) {
        return Regression::default();
    }

    // Constant y: the flat line through it is a perfect fit.
    if is_constant(y) {
        return Regression {
            slope: 0.0,
            intercept: y[0],
            r_squared: 1.0,
        };
    }

    let m = Moments::new(x, y);
    if m.sxx == 0.0 {
        return Regression::default();
    }

    let slope = m.sxy / m.sxx;
    let intercept = m.mean_y - slope * m.mean_x;

    let ss_tot = m.syy;
    let ss_res: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (yi - (m.mean_y + slope * (xi - m.mean_x))).powi(2))
        .sum();

    let r_squared = if ss_tot == 0.0 {
        if ss_res == 0.0 { 1.0 } else { f64::NAN }
    } else {
        1.0 - ss_res / ss_tot
    };

    Regression {
        slope,
        intercept,
        r_squared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {b}, got {a}");
    }

    #[test]
    fn perfect_positive_and_negative_correlation() {
        let x: Vec<f64> = (0..50).map(f64::from).collect();
        let up: Vec<f64> = x.iter().map(|v| 3.0 * v + 1.0).collect();
        let down: Vec<f64> = x.iter().map(|v| 100.0 - v).collect();
        assert_close(correlation(&x, &up), 1.0);
        assert_close(correlation(&x, &down), -1.0);
    }

    #[test]
    fn empty_and_mismatched_series_give_zero() {
        assert_eq!(correlation(&[], &[]), 0.0);
        assert_eq!(correlation(&[1.0], &[2.0, 3.0]), 0.0);
        assert_eq!(correlation(&[1.0], &[2.0]), 0.0);
    }

    #[test]
    fn constant_series_give_zero() {
        assert_eq!(correlation(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), 0.0);
        // Sums of 0.1 are inexact; this must still count as constant.
        let x: Vec<f64> = (0..10).map(f64::from).collect();
        assert_eq!(correlation(&x, &[0.1; 10]), 0.0);
    }

    #[test]
    fn regression_on_identity_line() {
        let r = linear_regression(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]);
        assert_eq!(r.slope, 1.0);
        assert_eq!(r.intercept, 0.0);
        assert_eq!(r.r_squared, 1.0);
    }

    #[test]
    fn regression_needs_two_points() {
        assert_eq!(linear_regression(&[], &[]), Regression::default());
        assert_eq!(linear_regression(&[1.0], &[4.0]), Regression::default());
        assert_eq!(linear_regression(&[1.0, 2.0], &[4.0]), Regression::default());
    }

    #[test]
    fn regression_with_constant_x_is_zero() {
        assert_eq!(linear_regression(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]), Regression::default());
    }

    #[test]
    fn regression_with_constant_y_is_a_perfect_flat_fit() {
        let r = linear_regression(&[1.0, 2.0, 3.0], &[0.1, 0.1, 0.1]);
        assert_close(r.slope, 0.0);
        assert_close(r.intercept, 0.1);
        assert_eq!(r.r_squared, 1.0);
    }

    #[test]
    fn regression_partial_fit() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 3.0, 5.0, 4.0];
        let r = linear_regression(&x, &y);
        assert_close(r.slope, 0.8);
        assert_close(r.intercept, 1.5);
        // r² equals the squared Pearson coefficient for simple regression.
        assert_close(r.r_squared, correlation(&x, &y).powi(2));
        assert!(r.r_squared > 0.0 && r.r_squared < 1.0);
    }

    #[test]
    fn large_offset_small_spread_still_correlates() {
        let x = [1e6, 1e6 + 1.0, 1e6 + 2.0];
        assert_close(correlation(&x, &x), 1.0);

        let fit = linear_regression(&x, &[1.0, 2.0, 3.0]);
        assert_close(fit.slope, 1.0);
        assert_close(fit.r_squared, 1.0);
        assert!((fit.intercept + 999_999.0).abs() < 1e-6);
    }

    #[test]
    fn large_offset_partial_fit_matches_squared_correlation() {
        let x = [1e6, 1e6 + 1.0, 1e6 + 2.0, 1e6 + 3.0];
        let y = [2.0, 3.0, 5.0, 4.0];
        let fit = linear_regression(&x, &y);
        assert_close(fit.slope, 0.8);
        assert_close(fit.r_squared, 0.64);
        assert_close(fit.r_squared, correlation(&x, &y).powi(2));
    }

    #[test]
    fn flat_fit_on_offset_outputs_has_no_explanatory_power() {
        let fit = linear_regression(&[0.0, 1.0, 2.0], &[1e6, 1e6 + 1.0, 1e6]);
        assert_close(fit.slope, 0.0);
        assert!(fit.r_squared.abs() < 1e-9, "got {}", fit.r_squared);

        // y deviations -5/6, 1/6, 2/3 around the line 0.75·x: R² = 27/28.
        let fit = linear_regression(&[0.0, 1.0, 2.0], &[1e6, 1e6 + 1.0, 1e6 + 1.5]);
        assert_close(fit.slope, 0.75);
        assert_close(fit.r_squared, 27.0 / 28.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_correlation_is_symmetric(
            pairs in prop::collection::vec((-1000i32..1000, -1000i32..1000), 0..40),
        ) {
            let x: Vec<f64> = pairs.iter().map(|p| f64::from(p.0)).collect();
            let y: Vec<f64> = pairs.iter().map(|p| f64::from(p.1)).collect();
            prop_assert_eq!(correlation(&x, &y), correlation(&y, &x));
        }

        #[test]
        fn prop_correlation_is_bounded(
            pairs in prop::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 0..40),
        ) {
            let x: Vec<f64> = pairs.iter().map(|p| p.0).collect();
            let y: Vec<f64> = pairs.iter().map(|p| p.1).collect();
            let r = correlation(&x, &y);
            prop_assert!(r.is_finite());
            prop_assert!((-1.0..=1.0).contains(&r));
        }

        #[test]
        fn prop_self_correlation_is_one(
            x in prop::collection::vec(-1000i32..1000, 2..40),
            offset in prop_oneof![Just(0.0), 1e5f64..1e7],
        ) {
            let x: Vec<f64> = x.into_iter().map(|v| offset + f64::from(v)).collect();
            prop_assume!(x.iter().any(|v| *v != x[0]));
            prop_assert!((correlation(&x, &x) - 1.0).abs() < 1e-9);
        }

        #[test]
        fn prop_regression_recovers_offset_line(
            x in prop::collection::vec(-1000i32..1000, 2..40),
            offset in 1e5f64..1e7,
        ) {
            let x: Vec<f64> = x.into_iter().map(|v| offset + f64::from(v)).collect();
            prop_assume!(x.iter().any(|v| *v != x[0]));
            let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 3.0).collect();
            let fit = linear_regression(&x, &y);
            prop_assert!((fit.slope - 2.0).abs() < 1e-6, "slope {}", fit.slope);
            prop_assert!((fit.r_squared - 1.0).abs() < 1e-9, "r² {}", fit.r_squared);
        }

        #[test]
        fn prop_correlation_with_constant_is_zero(
            x in prop::collection::vec(-1000i32..1000, 0..40),
            c in -1000i32..1000,
        ) {
            let x: Vec<f64> = x.into_iter().map(f64::from).collect();
            let y = vec![f64::from(c); x.len()];
            prop_assert_eq!(correlation(&x, &y), 0.0);
        }
    }
}
