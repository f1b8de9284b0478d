//! Descriptive statistics over plain return slices.
//!
//! Every function returns `None` when the sample is too small for the
//! statistic to be defined. Sample moments follow the bias-corrected
//! estimators used by common dataframe libraries, so results line up with
//! what analysts see elsewhere.

/// Second moments below this are treated as a constant sample.
const ZERO_VARIANCE: f64 = 1e-14;

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median, averaging the two middle values of an even-sized sample.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample standard deviation (`n - 1` denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss = values.iter().map(|x| (x - m).powi(2)).sum::<f64>();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Adjusted Fisher-Pearson skewness.
///
/// Formula: `G1 = sqrt(n(n-1)) / (n-2) * m3 / m2^1.5`
///
/// A constant sample has zero skewness.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let (m2, m3, _) = central_moments(values)?;
    if m2 < ZERO_VARIANCE {
        return Some(0.0);
    }
    let n = n as f64;
    let g1 = m3 / m2.powf(1.5);
    Some((n * (n - 1.0)).sqrt() / (n - 2.0) * g1)
}

/// Bias-corrected excess kurtosis.
///
/// Formula: `G2 = (n-1) / ((n-2)(n-3)) * ((n+1) * g2 + 6)` with
/// `g2 = m4 / m2^2 - 3`.
///
/// A constant sample has zero excess kurtosis.
pub fn excess_kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let (m2, _, m4) = central_moments(values)?;
    if m2 < ZERO_VARIANCE {
        return Some(0.0);
    }
    let n = n as f64;
    let g2 = m4 / (m2 * m2) - 3.0;
    Some((n - 1.0) / ((n - 2.0) * (n - 3.0)) * ((n + 1.0) * g2 + 6.0))
}

/// Biased second, third and fourth central moments.
fn central_moments(values: &[f64]) -> Option<(f64, f64, f64)> {
    let m = mean(values)?;
    let n = values.len() as f64;

    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for x in values {
        let d = x - m;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    Some((m2 / n, m3 / n, m4 / n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(&[3.0, 1.0, 2.0], 2.0)]
    #[case(&[4.0, 1.0, 3.0, 2.0], 2.5)]
    #[case(&[-0.1], -0.1)]
    fn test_median(#[case] values: &[f64], #[case] expected: f64) {
        assert_relative_eq!(median(values).unwrap(), expected);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(sample_std(&[1.0]), None);
        assert_eq!(skewness(&[1.0, 2.0]), None);
        assert_eq!(excess_kurtosis(&[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values).unwrap(), 5.0);
        // Population std is 2.0; sample std uses n - 1.
        assert_relative_eq!(sample_std(&values).unwrap(), (32.0_f64 / 7.0).sqrt());
    }

    #[test]
    fn test_symmetric_sample_has_no_skew() {
        assert_relative_eq!(skewness(&[-2.0, -1.0, 0.0, 1.0, 2.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_skew_sign() {
        assert!(skewness(&[0.0, 0.0, 0.0, 0.0, 10.0]).unwrap() > 0.0);
        assert!(skewness(&[0.0, 0.0, 0.0, 0.0, -10.0]).unwrap() < 0.0);
    }

    #[test]
    fn test_known_moments() {
        let values = [1.0, 2.0, 3.0, 4.0, 10.0];
        // Reference values from the adjusted estimators.
        assert_relative_eq!(skewness(&values).unwrap(), 1.697_056_27, epsilon = 1e-6);
        assert_relative_eq!(excess_kurtosis(&values).unwrap(), 3.152, epsilon = 1e-6);
    }

    #[test]
    fn test_constant_sample() {
        let values = [0.25; 6];
        assert_relative_eq!(sample_std(&values).unwrap(), 0.0);
        assert_eq!(skewness(&values), Some(0.0));
        assert_eq!(excess_kurtosis(&values), Some(0.0));
    }
}
