//! Array statistics for display.

use ndarray::ArrayD;
use std::fmt;

/// Shape and statistics of a loaded array.
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySummary {
    /// Shape of the data.
    pub shape: Vec<usize>,
    /// Minimum and maximum of the finite values.
    pub min_max: Option<(f64, f64)>,
    /// Mean of the finite values.
    pub mean: Option<f64>,
    /// Sample standard deviation of the finite values.
    pub std: Option<f64>,
    /// Count of finite values.
    pub valid_count: usize,
}

impl ArraySummary {
    /// Compute the summary of an array, ignoring NaN and infinities.
    pub fn of(data: &ArrayD<f64>) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0f64;
        let mut count = 0usize;
        for &v in data.iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
        }

        let mean = (count > 0).then(|| sum / count as f64);
        let std = match mean {
            Some(mean_val) if count > 1 => {
                let ssd: f64 = data
                    .iter()
                    .filter(|v| v.is_finite())
                    .map(|&v| (v - mean_val) * (v - mean_val))
                    .sum();
                Some((ssd / (count - 1) as f64).sqrt())
            }
            _ => None,
        };

        Self {
            shape: data.shape().to_vec(),
            min_max: (count > 0).then_some((min, max)),
            mean,
            std,
            valid_count: count,
        }
    }

    /// Total number of elements.
    pub fn total_elements(&self) -> usize {
        self.shape.iter().product()
    }
}

impl fmt::Display for ArraySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shape={:?} valid={}/{}",
            self.shape,
            format_number(self.valid_count),
            format_number(self.total_elements())
        )?;
        if let Some((min, max)) = self.min_max {
            write!(
                f,
                " min={} max={}",
                format_stat_value(min),
                format_stat_value(max)
            )?;
        }
        if let Some(mean) = self.mean {
            write!(f, " mean={}", format_stat_value(mean))?;
        }
        if let Some(std) = self.std {
            write!(f, " std={}", format_stat_value(std))?;
        }
        Ok(())
    }
}

/// Format a number with thousand separators.
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a statistic value with smart precision.
pub fn format_stat_value(val: f64) -> String {
    if !val.is_finite() {
        return if val.is_nan() {
            "NaN".to_string()
        } else if val.is_sign_positive() {
            "+Inf".to_string()
        } else {
            "-Inf".to_string()
        };
    }
    let abs_val = val.abs();
    if abs_val == 0.0 {
        "0".to_string()
    } else if !(1e-3..1e6).contains(&abs_val) {
        format!("{:.3e}", val)
    } else if abs_val >= 100.0 {
        format!("{:.2}", val)
    } else if abs_val >= 1.0 {
        format!("{:.4}", val)
    } else {
        format!("{:.5}", val)
    }
}
