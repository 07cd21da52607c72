//! Small descriptive statistics over window values.

use reg_core::Period;

#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). Needs two values.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn sample_sd(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let centre = mean(values)?;
    let squares: f64 = values.iter().map(|v| (v - centre).powi(2)).sum();
    Some((squares / (values.len() - 1) as f64).sqrt())
}

/// Change per period between consecutive values, which need not be adjacent.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn first_differences(points: &[(Period, f64)]) -> Vec<f64> {
    points
        .windows(2)
        .map(|pair| {
            let (earlier, before) = pair[0];
            let (later, after) = pair[1];
            (after - before) / earlier.periods_until(later) as f64
        })
        .collect()
}

pub(crate) fn values(points: &[(Period, f64)]) -> Vec<f64> {
    points.iter().map(|&(_, value)| value).collect()
}
