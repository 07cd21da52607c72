//! Impact Estimator: before/after statistics for one aligned window.
//!
//! Everything here is a pure function of the window and the analysis
//! settings. `trend_break_detected` is a heuristic that compares mean
//! first-difference slopes against the spread of pre-event differences; it
//! is not a formal structural-break test.

use reg_config::AnalysisConfig;
use reg_core::{Confidence, ImpactResult};
use reg_registry::EventRegistry;

use crate::align::AlignedWindow;
use crate::stats::{first_differences, mean, sample_sd, values};

/// Compute the impact estimate for `window`.
///
/// `confounders` is left empty; see [`confounders`].
#[must_use]
pub fn estimate(window: &AlignedWindow<'_>, config: &AnalysisConfig) -> ImpactResult {
    let pre = values(window.pre_values());
    let post = values(window.post_values());

    let pre_mean = mean(&pre);
    let post_mean = mean(&post);
    let delta_abs = pre_mean.zip(post_mean).map(|(before, after)| after - before);
    let delta_pct = delta_abs
        .zip(pre_mean)
        .and_then(|(delta, before)| relative_change(delta, before));

    let pre_diffs = first_differences(window.pre_values());
    let post_diffs = first_differences(window.post_values());
    let pre_slope = mean(&pre_diffs);
    let post_slope = mean(&post_diffs);

    let series = window.series();
    ImpactResult {
        country: series.country().to_string(),
        metric_id: series.metric_id().to_string(),
        source_id: series.source_id().to_string(),
        event_id: window.event().event_id.clone(),
        pre_period: window.pre_period(),
        post_period: window.post_period(),
        pre_count: pre.len(),
        post_count: post.len(),
        pre_mean,
        post_mean,
        delta_abs,
        delta_pct,
        pre_slope,
        post_slope,
        trend_break_detected: trend_break(&pre_diffs, &post_diffs, config.trend_break_threshold),
        confidence: confidence(window, &pre, config),
        confounders: Vec::new(),
    }
}

/// Ids of the registry's context periods overlapping either window.
#[must_use]
pub fn confounders(window: &AlignedWindow<'_>, registry: &EventRegistry) -> Vec<String> {
    let start = window.pre_period().start.start_date();
    let end = window.post_period().end.end_date();
    registry
        .overlapping_context(start, end)
        .into_iter()
        .map(|period| period.id.clone())
        .collect()
}

/// `delta / baseline`, undefined for a zero baseline or a non-finite ratio.
fn relative_change(delta: f64, baseline: f64) -> Option<f64> {
    if baseline == 0.0 {
        return None;
    }
    let ratio = delta / baseline;
    ratio.is_finite().then_some(ratio)
}

fn trend_break(pre_diffs: &[f64], post_diffs: &[f64], threshold: f64) -> bool {
    if pre_diffs.len() < 2 || post_diffs.is_empty() {
        return false;
    }
    let (Some(pre_slope), Some(post_slope), Some(spread)) =
        (mean(pre_diffs), mean(post_diffs), sample_sd(pre_diffs))
    else {
        return false;
    };
    (post_slope - pre_slope).abs() > threshold * spread
}

fn confidence(window: &AlignedWindow<'_>, pre: &[f64], config: &AnalysisConfig) -> Confidence {
    if window.insufficient_data() {
        return Confidence::InsufficientData;
    }
    let enough = window.pre_values().len() >= config.high_confidence_min_observations
        && window.post_values().len() >= config.high_confidence_min_observations;
    let stable = coefficient_of_variation(pre)
        .is_some_and(|cv| cv < config.cv_high_confidence_threshold);
    if enough && stable {
        Confidence::High
    } else {
        Confidence::Medium
    }
}

/// `sd / |mean|`; undefined at a zero mean.
fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let centre = mean(values)?;
    if centre == 0.0 {
        return None;
    }
    Some(sample_sd(values)? / centre.abs())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use reg_core::{
        AggregationKind, Applicability, Event, EventCategory, Frequency, Metric, Observation,
        Period, Series, SourceDescriptor,
    };
    use rstest::rstest;

    use super::*;
    use crate::align::{WindowSpec, align};

    fn event() -> Event {
        Event {
            event_id: "gdpr".into(),
            name: "General Data Protection Regulation".into(),
            effective_date: NaiveDate::from_ymd_opt(2018, 5, 25).unwrap(),
            applicability: Applicability::All,
            category: EventCategory::DataProtection,
        }
    }

    fn metric() -> Metric {
        Metric::new("price", "EUR", Frequency::Annual, false, AggregationKind::Mean)
    }

    /// Annual series starting in `first_year`.
    fn series(first_year: i32, values: &[Option<f64>]) -> Series {
        let descriptor = SourceDescriptor::new("DE", "price", "test", Frequency::Annual);
        let observations = values
            .iter()
            .zip(first_year..)
            .map(|(&value, year)| {
                Observation::new("DE", "price", "test", Period::annual(year).unwrap(), value)
            })
            .collect();
        Series::new(descriptor, observations).unwrap()
    }

    fn run(series: &Series, spec: WindowSpec) -> ImpactResult {
        let event = event();
        let window = align(series, &event, &metric(), spec).unwrap().unwrap();
        estimate(&window, &AnalysisConfig::default())
    }

    #[test]
    fn zero_baseline_leaves_delta_pct_undefined() {
        let s = series(2015, &[Some(0.0), Some(0.0), Some(0.0), Some(1.0), Some(2.0), Some(3.0)]);
        let result = run(&s, WindowSpec::new(3, 2, 3));
        assert_eq!(result.pre_mean, Some(0.0));
        assert_eq!(result.delta_abs, Some(2.0));
        assert_eq!(result.delta_pct, None);
    }

    #[test]
    fn slope_change_beyond_noise_is_a_trend_break() {
        // Pre: steady +1 per year with a little noise; post: -3 per year.
        let s = series(
            2013,
            &[
                Some(10.0),
                Some(11.1),
                Some(11.9),
                Some(13.0),
                Some(14.1),
                Some(11.0),
                Some(8.0),
                Some(5.0),
            ],
        );
        let result = run(&s, WindowSpec::new(5, 2, 3));
        assert!(result.trend_break_detected);
        assert!(result.pre_slope.unwrap() > 0.0);
        assert!(result.post_slope.unwrap() < 0.0);
    }

    #[test]
    fn continuing_trend_is_not_a_break() {
        let s = series(
            2013,
            &[
                Some(10.0),
                Some(11.2),
                Some(11.9),
                Some(13.1),
                Some(14.0),
                Some(15.1),
                Some(15.9),
                Some(17.0),
            ],
        );
        let result = run(&s, WindowSpec::new(5, 2, 3));
        assert!(!result.trend_break_detected);
    }

    #[test]
    fn single_pre_difference_never_breaks() {
        let s = series(2016, &[Some(1.0), Some(2.0), Some(50.0), Some(90.0)]);
        let result = run(&s, WindowSpec::new(2, 1, 2));
        assert!(!result.trend_break_detected);
    }

    #[test]
    fn missing_values_are_excluded_from_means() {
        let s = series(
            2014,
            &[Some(10.0), None, Some(20.0), Some(30.0), Some(40.0), None, Some(50.0)],
        );
        let result = run(&s, WindowSpec::new(4, 2, 2));
        assert_eq!(result.pre_count, 3);
        assert_eq!(result.pre_mean, Some(20.0));
        assert_eq!(result.post_count, 2);
        assert_eq!(result.post_mean, Some(45.0));
    }

    #[rstest]
    #[case(&[Some(30.0), Some(30.5), Some(29.5), Some(30.0), Some(30.2), Some(29.8)], Confidence::High)]
    #[case(&[Some(1.0), Some(30.0), Some(2.0), Some(50.0), Some(3.0), Some(40.0)], Confidence::Medium)]
    fn variation_decides_between_high_and_medium(
        #[case] pre: &[Option<f64>],
        #[case] expected: Confidence,
    ) {
        let mut values = pre.to_vec();
        values.extend([Some(25.0); 6]);
        let s = series(2012, &values);
        let result = run(&s, WindowSpec::new(6, 5, 3));
        assert_eq!(result.confidence, expected);
    }

    #[test]
    fn too_few_values_for_high_is_medium() {
        let s = series(
            2015,
            &[Some(30.0), Some(30.0), Some(30.0), Some(25.0), Some(25.0), Some(25.0)],
        );
        let result = run(&s, WindowSpec::new(3, 2, 3));
        assert_eq!(result.confidence, Confidence::Medium);
    }

    #[test]
    fn zero_mean_pre_window_is_never_high() {
        let mut values = vec![Some(-1.0), Some(1.0), Some(-1.0), Some(1.0), Some(-1.0), Some(1.0)];
        values.extend([Some(5.0); 6]);
        let s = series(2012, &values);
        let result = run(&s, WindowSpec::new(6, 5, 3));
        assert_eq!(result.pre_mean, Some(0.0));
        assert_eq!(result.confidence, Confidence::Medium);
    }
}
