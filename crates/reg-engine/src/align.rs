//! Alignment Engine: event-relative pre/post windows.
//!
//! The event is anchored at the canonical-frequency period containing its
//! effective date. With spans `p` and `q`:
//!
//! ```text
//! pre  = [event - p, event - 1]
//! post = [event, event + q]        (inclusive, q + 1 periods)
//! ```
//!
//! Finer series are first aggregated to the metric's canonical frequency;
//! alignment never carries values forward. A series coarser than its metric
//! is rejected, since spreading one value over several periods would count
//! it more than once.
//! Missing values are excluded from both windows.

use std::borrow::Cow;

use reg_config::AnalysisConfig;
use reg_core::{Event, Metric, Period, PeriodRange, ProfilePoint, Series};
use reg_series::{ResampleOptions, resample};

use crate::error::EngineError;

/// Window sizes and the sufficiency threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    pub pre_span: u32,
    pub post_span: u32,
    pub min_observations: usize,
}

impl WindowSpec {
    #[must_use]
    pub const fn new(pre_span: u32, post_span: u32, min_observations: usize) -> Self {
        Self {
            pre_span,
            post_span,
            min_observations,
        }
    }
}

impl From<&AnalysisConfig> for WindowSpec {
    fn from(config: &AnalysisConfig) -> Self {
        Self::new(
            config.pre_span_periods,
            config.post_span_periods,
            config.min_observations,
        )
    }
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

/// Pre- and post-event values of one series around one event.
///
/// Borrows the series when it is already at canonical frequency and owns the
/// resampled copy otherwise.
#[derive(Debug, Clone)]
pub struct AlignedWindow<'a> {
    series: Cow<'a, Series>,
    event: &'a Event,
    event_period: Period,
    pre_period: PeriodRange,
    post_period: PeriodRange,
    pre: Vec<(Period, f64)>,
    post: Vec<(Period, f64)>,
    insufficient_data: bool,
}

impl<'a> AlignedWindow<'a> {
    /// The series at canonical frequency.
    #[must_use]
    pub fn series(&self) -> &Series {
        &self.series
    }

    #[must_use]
    pub const fn event(&self) -> &'a Event {
        self.event
    }

    #[must_use]
    pub const fn event_period(&self) -> Period {
        self.event_period
    }

    #[must_use]
    pub const fn pre_period(&self) -> PeriodRange {
        self.pre_period
    }

    #[must_use]
    pub const fn post_period(&self) -> PeriodRange {
        self.post_period
    }

    /// Non-missing pre-window values in period order.
    #[must_use]
    pub fn pre_values(&self) -> &[(Period, f64)] {
        &self.pre
    }

    /// Non-missing post-window values in period order.
    #[must_use]
    pub fn post_values(&self) -> &[(Period, f64)] {
        &self.post
    }

    /// Either window has fewer than `min_observations` values.
    #[must_use]
    pub const fn insufficient_data(&self) -> bool {
        self.insufficient_data
    }
}

/// Align `series` around `event`.
///
/// Returns `Ok(None)` when the event's effective date lies outside the span
/// the series covers (or the series is empty); such a pair is neither a
/// result nor an error.
pub fn align<'a>(
    series: &'a Series,
    event: &'a Event,
    metric: &Metric,
    spec: WindowSpec,
) -> Result<Option<AlignedWindow<'a>>, EngineError> {
    let Some((first_day, last_day)) = series.observed_span() else {
        return Ok(None);
    };
    if event.effective_date < first_day || event.effective_date > last_day {
        tracing::debug!(
            series = %series.key(),
            event = %event.event_id,
            "effective date outside series span"
        );
        return Ok(None);
    }

    let canonical = canonical_series(series, metric)?;
    let event_period = Period::containing(event.effective_date, metric.expected_frequency);
    let pre_period = PeriodRange::new(
        event_period.offset(-i64::from(spec.pre_span)),
        event_period.prev(),
    );
    let post_period = PeriodRange::new(
        event_period,
        event_period.offset(i64::from(spec.post_span)),
    );

    let pre = canonical.values_between(pre_period.start, pre_period.end);
    let post = canonical.values_between(post_period.start, post_period.end);
    let insufficient_data = pre.len() < spec.min_observations || post.len() < spec.min_observations;

    Ok(Some(AlignedWindow {
        series: canonical,
        event,
        event_period,
        pre_period,
        post_period,
        pre,
        post,
        insufficient_data,
    }))
}

/// Values at event-relative offsets `-radius..=radius` around `event`, at the
/// metric's canonical frequency. Offsets without a value are `None`.
pub fn event_profile(
    series: &Series,
    event: &Event,
    metric: &Metric,
    radius: u32,
) -> Result<Vec<ProfilePoint>, EngineError> {
    let canonical = canonical_series(series, metric)?;
    let event_period = Period::containing(event.effective_date, metric.expected_frequency);
    let radius = i64::from(radius);
    Ok((-radius..=radius)
        .map(|offset| {
            let period = event_period.offset(offset);
            ProfilePoint {
                offset,
                period,
                value: canonical.get(period).and_then(|obs| obs.value),
            }
        })
        .collect())
}

fn canonical_series<'a>(
    series: &'a Series,
    metric: &Metric,
) -> Result<Cow<'a, Series>, EngineError> {
    if series.frequency() == metric.expected_frequency {
        return Ok(Cow::Borrowed(series));
    }
    if series.frequency().is_coarser_than(metric.expected_frequency) {
        return Err(EngineError::CoarserThanMetric {
            series: series.key().to_string(),
            from: series.frequency(),
            to: metric.expected_frequency,
        });
    }
    let options = ResampleOptions::aggregate_only(metric.aggregation_kind);
    Ok(Cow::Owned(resample(series, metric.expected_frequency, options)?))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use reg_core::{
        AggregationKind, Applicability, EventCategory, Frequency, Observation, SourceDescriptor,
    };

    use super::*;

    fn event(year: i32, month: u32, day: u32) -> Event {
        Event {
            event_id: "gdpr".into(),
            name: "General Data Protection Regulation".into(),
            effective_date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            applicability: Applicability::All,
            category: EventCategory::DataProtection,
        }
    }

    fn quarterly_metric(aggregation: AggregationKind) -> Metric {
        Metric::new("price", "EUR", Frequency::Quarterly, false, aggregation)
    }

    fn series(frequency: Frequency, first: &str, values: &[Option<f64>]) -> Series {
        let start: Period = first.parse().unwrap();
        let descriptor = SourceDescriptor::new("DE", "price", "test", frequency);
        let observations = (0_i64..)
            .zip(values)
            .map(|(offset, &value)| {
                Observation::new("DE", "price", "test", start.offset(offset), value)
            })
            .collect();
        Series::new(descriptor, observations).unwrap()
    }

    #[test]
    fn windows_are_anchored_on_the_event_period() {
        let s = series(Frequency::Quarterly, "2016-Q1", &[Some(1.0); 20]);
        let e = event(2018, 5, 25);
        let metric = quarterly_metric(AggregationKind::Mean);
        let window = align(&s, &e, &metric, WindowSpec::default())
            .unwrap()
            .unwrap();

        assert_eq!(window.event_period().to_string(), "2018-Q2");
        assert_eq!(window.pre_period().to_string(), "2016-Q2..2018-Q1");
        assert_eq!(window.post_period().to_string(), "2018-Q2..2020-Q2");
        assert_eq!(window.pre_values().len(), 8);
        assert_eq!(window.post_values().len(), 9);
        assert!(!window.insufficient_data());
    }

    #[test]
    fn event_before_first_observation_is_skipped() {
        let s = series(Frequency::Quarterly, "2019-Q1", &[Some(1.0); 8]);
        let e = event(2018, 5, 25);
        let metric = quarterly_metric(AggregationKind::Mean);
        let window = align(&s, &e, &metric, WindowSpec::default()).unwrap();
        assert!(window.is_none());
    }

    #[test]
    fn event_on_last_day_of_span_is_aligned() {
        let s = series(Frequency::Quarterly, "2017-Q1", &[Some(1.0); 6]);
        let e = event(2018, 6, 30);
        let metric = quarterly_metric(AggregationKind::Mean);
        let window = align(&s, &e, &metric, WindowSpec::default())
            .unwrap()
            .unwrap();
        assert_eq!(window.post_values().len(), 1);
        assert!(window.insufficient_data());
    }

    #[test]
    fn monthly_series_is_aggregated_without_carry_forward() {
        // 2018-Q1 has no values at all; it must stay missing.
        let mut values = vec![Some(3.0); 12];
        values.extend([None, None, None]);
        values.extend([Some(6.0); 6]);
        let s = series(Frequency::Monthly, "2017-01", &values);
        let e = event(2018, 5, 25);
        let window = align(
            &s,
            &e,
            &quarterly_metric(AggregationKind::Mean),
            WindowSpec::new(4, 1, 2),
        )
        .unwrap()
        .unwrap();

        assert_eq!(window.series().frequency(), Frequency::Quarterly);
        let pre: Vec<String> = window
            .pre_values()
            .iter()
            .map(|(period, _)| period.to_string())
            .collect();
        assert_eq!(pre, vec!["2017-Q2", "2017-Q3", "2017-Q4"]);
        let q = |text: &str| text.parse::<Period>().unwrap();
        assert_eq!(
            window.post_values().to_vec(),
            vec![(q("2018-Q2"), 6.0), (q("2018-Q3"), 6.0)]
        );
    }

    #[test]
    fn summed_metric_cannot_align_a_coarser_series() {
        let s = series(Frequency::Annual, "2015", &[Some(1.0); 6]);
        let e = event(2018, 5, 25);
        let metric = quarterly_metric(AggregationKind::Sum);
        let err = align(&s, &e, &metric, WindowSpec::default()).unwrap_err();
        assert!(matches!(err, EngineError::CoarserThanMetric { .. }));
    }

    #[test]
    fn annual_series_is_not_spread_over_quarters() {
        // Two real pre-event years must not turn into eight quarters.
        let s = series(
            Frequency::Annual,
            "2016",
            &[Some(30.0), Some(30.0), Some(25.0), Some(25.0), Some(25.0)],
        );
        let e = event(2018, 5, 25);
        let err = align(
            &s,
            &e,
            &quarterly_metric(AggregationKind::Mean),
            WindowSpec::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::CoarserThanMetric {
                from: Frequency::Annual,
                to: Frequency::Quarterly,
                ..
            }
        ));
        assert!(err.to_string().contains("does not disaggregate"));
    }

    #[test]
    fn profile_rejects_a_coarser_series() {
        let s = series(Frequency::Annual, "2016", &[Some(1.0); 5]);
        let e = event(2018, 5, 25);
        let err = event_profile(&s, &e, &quarterly_metric(AggregationKind::Mean), 2).unwrap_err();
        assert!(matches!(err, EngineError::CoarserThanMetric { .. }));
    }

    #[test]
    fn profile_reports_offsets_around_the_event() {
        let s = series(
            Frequency::Quarterly,
            "2018-Q1",
            &[Some(1.0), Some(2.0), None, Some(4.0)],
        );
        let e = event(2018, 5, 25);
        let profile = event_profile(&s, &e, &quarterly_metric(AggregationKind::Mean), 2).unwrap();
        let got: Vec<(i64, Option<f64>)> = profile.iter().map(|p| (p.offset, p.value)).collect();
        assert_eq!(
            got,
            vec![(-2, None), (-1, Some(1.0)), (0, Some(2.0)), (1, None), (2, Some(4.0))]
        );
    }
}
