//! Column-level descriptive statistics.

use serde::Serialize;

// =============================================================================
// STREAMING STATISTICS
// =============================================================================
// Welford's online algorithm for computing mean and variance in a single pass.

/// Streaming accumulator for count, mean, variance and range.
#[derive(Debug, Clone)]
pub struct RunningStats {
    count: usize,
    mean: f64,
    m2: f64, // Sum of squared differences from mean
    min: f64,
    max: f64,
    sum: f64,
}

impl RunningStats {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.0,
        }
    }

    /// Add a value.
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;

        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Mean, NaN when empty.
    pub fn mean(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.mean }
    }

    /// Sample standard deviation (n - 1 denominator), NaN below two values.
    pub fn sample_std(&self) -> f64 {
        if self.count < 2 {
            f64::NAN
        } else {
            (self.m2 / (self.count - 1) as f64).sqrt()
        }
    }

    /// Minimum, NaN when empty.
    pub fn min(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.min }
    }

    /// Maximum, NaN when empty.
    pub fn max(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.max }
    }
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = RunningStats::new();
        for value in iter {
            stats.push(value);
        }
        stats
    }
}

/// Quantile with linear interpolation between closest ranks.
///
/// `q` is in `[0, 1]`. Returns NaN for an empty slice.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Pearson correlation coefficient.
///
/// NaN when the inputs differ in length, have fewer than two points, or
/// either side has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return f64::NAN;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }

    (covariance / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Summary statistics for one numeric column or group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub missing: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
}

impl ColumnSummary {
    /// Summarise present values; `missing` is carried through unchanged.
    pub fn from_values(values: &[f64], missing: usize) -> Self {
        let running: RunningStats = values.iter().copied().collect();

        Self {
            count: running.count(),
            missing,
            mean: running.mean(),
            median: quantile(values, 0.5),
            std: running.sample_std(),
            min: running.min(),
            max: running.max(),
            q1: quantile(values, 0.25),
            q3: quantile(values, 0.75),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_running_stats() {
        let stats: RunningStats = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter().collect();
        assert_eq!(stats.count(), 8);
        assert!(approx(stats.mean(), 5.0));
        assert!(approx(stats.sum(), 40.0));
        assert!(approx(stats.sample_std(), (32.0f64 / 7.0).sqrt()));
        assert_eq!(stats.min(), 2.0);
        assert_eq!(stats.max(), 9.0);
    }

    #[test]
    fn test_empty_stats_are_nan() {
        let stats = RunningStats::new();
        assert!(stats.mean().is_nan());
        assert!(stats.min().is_nan());
        assert!(stats.sample_std().is_nan());
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert!(approx(quantile(&values, 0.5), 2.5));
        assert!(approx(quantile(&values, 0.25), 1.75));
        assert!(approx(quantile(&values, 0.75), 3.25));
        assert!(approx(quantile(&[4.0, 1.0, 3.0], 0.5), 3.0));
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn test_pearson() {
        assert!(approx(pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0));
        assert!(approx(pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), -1.0));
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
        assert!(pearson(&[1.0], &[1.0]).is_nan());
    }

    #[test]
    fn test_column_summary() {
        let summary = ColumnSummary::from_values(&[10.0, 20.0, 30.0, 40.0, 50.0], 1);
        assert_eq!(summary.count, 5);
        assert_eq!(summary.missing, 1);
        assert!(approx(summary.mean, 30.0));
        assert!(approx(summary.median, 30.0));
        assert!(approx(summary.q1, 20.0));
        assert!(approx(summary.q3, 40.0));
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.max, 50.0);
    }
}
