//! Summary statistics over distance samples.
//!
//! Small, allocation-light helpers used by the comparison view: mean,
//! sample standard deviation, quartiles, and an aggregate [`Summary`].

/// Arithmetic mean. `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n − 1 denominator).
///
/// `None` for fewer than two values, where the statistic is undefined.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// First, second (median), and third quartile of a value sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quartiles {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

/// Compute quartiles by linear interpolation over the sorted values.
///
/// `None` for empty input. A single value yields that value for all
/// three quartiles.
pub fn quartiles(values: &[f64]) -> Option<Quartiles> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Some(Quartiles {
        q1: percentile(&sorted, 0.25),
        median: percentile(&sorted, 0.5),
        q3: percentile(&sorted, 0.75),
    })
}

/// Interpolated percentile over an already-sorted slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let last = sorted.len() - 1;
    let rank = p * last as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Aggregate statistics over one distance group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    /// Number of values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation; `None` below two values
    pub std_dev: Option<f64>,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Quartiles by linear interpolation
    pub quartiles: Quartiles,
}

impl Summary {
    /// Summarize a value sequence. `None` for empty input.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mean = mean(values)?;
        let quartiles = quartiles(values)?;
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            count: values.len(),
            mean,
            std_dev: std_dev(values),
            min,
            max,
            quartiles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_mean_known_values() {
        assert_eq!(mean(&[2.0, 4.0, 6.0]), Some(4.0));
        assert_eq!(mean(&[5.0]), Some(5.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_std_dev_known_values() {
        // Sample std dev of [2, 4, 4, 4, 5, 5, 7, 9] is ~2.138.
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let sd = std_dev(&values).unwrap();
        assert!((sd - 2.138089935).abs() < 1e-6);
    }

    #[test]
    fn test_std_dev_undefined_below_two() {
        assert_eq!(std_dev(&[]), None);
        assert_eq!(std_dev(&[3.0]), None);
    }

    #[test]
    fn test_std_dev_zero_for_constant() {
        let sd = std_dev(&[4.0, 4.0, 4.0]).unwrap();
        assert!(sd.abs() < EPS);
    }

    #[test]
    fn test_quartiles_odd_count() {
        let q = quartiles(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!((q.q1 - 2.0).abs() < EPS);
        assert!((q.median - 3.0).abs() < EPS);
        assert!((q.q3 - 4.0).abs() < EPS);
    }

    #[test]
    fn test_quartiles_even_count() {
        let q = quartiles(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((q.q1 - 1.75).abs() < EPS);
        assert!((q.median - 2.5).abs() < EPS);
        assert!((q.q3 - 3.25).abs() < EPS);
    }

    #[test]
    fn test_quartiles_unsorted_input() {
        let q = quartiles(&[5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();
        assert!((q.median - 3.0).abs() < EPS);
    }

    #[test]
    fn test_quartiles_single_value() {
        let q = quartiles(&[7.5]).unwrap();
        assert_eq!(q.q1, 7.5);
        assert_eq!(q.median, 7.5);
        assert_eq!(q.q3, 7.5);
    }

    #[test]
    fn test_summary_aggregates() {
        let values = [3.0, 1.0, 2.0];
        let summary = Summary::from_values(&values).unwrap();
        assert_eq!(summary.count, 3);
        assert!((summary.mean - 2.0).abs() < EPS);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 3.0);
        assert!((summary.quartiles.median - 2.0).abs() < EPS);
        assert!(summary.std_dev.is_some());
    }

    #[test]
    fn test_summary_empty() {
        assert_eq!(Summary::from_values(&[]), None);
    }
}
