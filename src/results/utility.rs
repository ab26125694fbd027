//! Summary statistics over a class's or an evaluation's scores.

/// Average of a score series; an empty class averages to 0.0.
pub fn mean(scores: &[f64]) -> f64 {
    match scores.len() {
        0 => 0.0,
        n => scores.iter().sum::<f64>() / n as f64,
    }
}

/// Mean of a score series and its population standard deviation.
/// Both are 0.0 for an empty series.
pub fn mean_and_stddev(scores: &[f64]) -> (f64, f64) {
    let avg = mean(scores);
    if scores.is_empty() {
        return (avg, 0.0);
    }
    let variance = scores.iter().map(|s| (s - avg).powi(2)).sum::<f64>() / scores.len() as f64;
    (avg, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_series() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean_and_stddev(&[]), (0.0, 0.0));
    }

    #[test]
    fn test_class_proficiency_spread() {
        // Anos Finais, non-math: raw 2, 6, 7.5, 9 -> 80, 240, 300, 360
        let (avg, sd) = mean_and_stddev(&[80.0, 240.0, 300.0, 360.0]);
        assert_eq!(avg, 245.0);
        // deviations -165, -5, 55, 115 -> variance 10875
        assert!((sd - 10875f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_uniform_class_has_no_spread() {
        assert_eq!(mean_and_stddev(&[175.0, 175.0, 175.0]), (175.0, 0.0));
    }
}
