//! One-sample two-sided t-test.
//!
//! Null hypothesis: the population mean of the sample equals `reference`.
//! The p-value comes from the Student's t distribution with `n - 1` degrees
//! of freedom, evaluated through the regularized incomplete beta function
//! (continued-fraction form), so no normal approximation is involved even
//! for small samples.
//!
//! The test is a pure function of the sample's multiset of values: the
//! order of the input vector does not affect the result.

use crate::domain::TTest;
use crate::error::AppError;

/// Run the test. `sample` must have at least 2 values and non-zero variance.
pub fn one_sample_ttest(sample: &[f64], reference: f64) -> Result<TTest, AppError> {
    let n = sample.len();
    if n < 2 {
        return Err(AppError::insufficient_data(format!(
            "t-test needs at least 2 observations, got {n}."
        )));
    }
    if sample.iter().any(|v| !v.is_finite()) || !reference.is_finite() {
        return Err(AppError::insufficient_data(
            "t-test inputs must be finite (no missing entries).",
        ));
    }

    let nf = n as f64;
    let mean = sample.iter().sum::<f64>() / nf;
    let variance = sample.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (nf - 1.0);

    if variance <= 0.0 {
        return Err(AppError::insufficient_data(
            "t-test sample has zero variance; the statistic is undefined.",
        ));
    }

    let std_error = (variance / nf).sqrt();
    let statistic = (mean - reference) / std_error;

    let df = nf - 1.0;
    let p_value = (2.0 * student_t_sf(statistic.abs(), df)).clamp(0.0, 1.0);

    Ok(TTest {
        statistic,
        p_value,
        n,
    })
}

/// Survival function P(T > t) of the Student's t distribution, for t >= 0.
fn student_t_sf(t: f64, df: f64) -> f64 {
    let x = df / (df + t * t);
    0.5 * incomplete_beta(0.5 * df, 0.5, x)
}

/// Regularized incomplete beta function I_x(a, b).
fn incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_front =
        ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();

    // Use the continued fraction directly where it converges fast, and the
    // symmetry relation I_x(a,b) = 1 - I_{1-x}(b,a) elsewhere.
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_cont_frac(a, b, x) / a
    } else {
        1.0 - front * beta_cont_frac(b, a, 1.0 - x) / b
    }
}

/// Continued fraction for the incomplete beta function (Lentz's method).
fn beta_cont_frac(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITER: usize = 200;
    const EPS: f64 = 3.0e-14;
    const FPMIN: f64 = 1.0e-300;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < FPMIN {
        d = FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;

        if (del - 1.0).abs() < EPS {
            break;
        }
    }

    h
}

/// Natural log of the gamma function (Lanczos approximation).
fn ln_gamma(x: f64) -> f64 {
    const COEF: [f64; 6] = [
        76.180_091_729_471_46,
        -86.505_320_329_416_77,
        24.014_098_240_830_91,
        -1.231_739_572_450_155,
        0.120_865_097_386_617_9e-2,
        -0.539_523_938_495_3e-5,
    ];

    let tmp = x + 5.5;
    let tmp = tmp - (x + 0.5) * tmp.ln();
    let mut ser = 1.000_000_000_190_015;
    let mut y = x;
    for c in COEF {
        y += 1.0;
        ser += c / y;
    }
    -tmp + (2.506_628_274_631_000_5 * ser / x).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_equal_to_reference_gives_t_zero_p_one() {
        let result = one_sample_ttest(&[1.0, 2.0, 3.0, 4.0, 5.0], 3.0).unwrap();
        assert!(result.statistic.abs() < 1e-12);
        assert!((result.p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn matches_reference_implementation() {
        // scipy.stats.ttest_1samp([1,2,3,4,5], 0) -> t=4.2426..., p=0.01324...
        let result = one_sample_ttest(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.0).unwrap();
        assert!((result.statistic - 4.242_640_687).abs() < 1e-6);
        assert!((result.p_value - 0.013_24).abs() < 5e-4);
        assert!(result.is_significant(0.05));
        assert!(!result.is_significant(0.01));
    }

    #[test]
    fn p_value_is_order_invariant() {
        let a = one_sample_ttest(&[10.0, 12.0, 9.0, 14.0, 11.0], 20.0).unwrap();
        let b = one_sample_ttest(&[14.0, 9.0, 11.0, 10.0, 12.0], 20.0).unwrap();
        assert_eq!(a.statistic, b.statistic);
        assert_eq!(a.p_value, b.p_value);
    }

    #[test]
    fn extreme_reference_gives_vanishing_p_value() {
        let sample: Vec<f64> = (0..300).map(|i| 100.0 + (i % 7) as f64).collect();
        let result = one_sample_ttest(&sample, 700.0).unwrap();
        assert!(result.p_value < 1e-20);
    }

    #[test]
    fn degenerate_samples_are_rejected() {
        assert!(one_sample_ttest(&[5.0], 1.0).is_err());
        assert!(one_sample_ttest(&[5.0, 5.0, 5.0], 1.0).is_err());
        assert!(one_sample_ttest(&[1.0, f64::NAN], 1.0).is_err());
    }

    #[test]
    fn incomplete_beta_endpoints() {
        assert_eq!(incomplete_beta(2.0, 0.5, 0.0), 0.0);
        assert_eq!(incomplete_beta(2.0, 0.5, 1.0), 1.0);
        // I_x(1,1) is the identity on [0,1].
        assert!((incomplete_beta(1.0, 1.0, 0.25) - 0.25).abs() < 1e-12);
    }
}
