//! End-to-end runs over small hand-built stores.

use pretty_assertions::assert_eq;
use reg_config::{ConfigError, Measure, RegulaConfig};
use reg_core::{
    AggregationKind, Confidence, Frequency, GroupBy, Metric, Observation, Period, Series,
    SourceDescriptor,
};
use reg_engine::{ImpactPipeline, PipelineError};
use reg_registry::{EventRegistry, MetricCatalog};
use reg_series::SeriesStore;

fn quarterly_catalog() -> MetricCatalog {
    MetricCatalog::new(vec![
        Metric::new(
            "broadband_price",
            "PPP EUR",
            Frequency::Quarterly,
            false,
            AggregationKind::Mean,
        ),
        Metric::new(
            "broadband_traffic",
            "exabytes",
            Frequency::Quarterly,
            true,
            AggregationKind::Sum,
        ),
    ])
    .unwrap()
}

fn series(
    country: &str,
    metric: &str,
    frequency: Frequency,
    first: &str,
    values: &[Option<f64>],
) -> Series {
    let start: Period = first.parse().unwrap();
    let descriptor = SourceDescriptor::new(country, metric, "test", frequency);
    let observations = (0_i64..)
        .zip(values)
        .map(|(offset, &value)| {
            Observation::new(country, metric, "test", start.offset(offset), value)
        })
        .collect();
    Series::new(descriptor, observations).unwrap()
}

/// Quarterly German broadband price 2016-Q1..2020-Q4: 30 before GDPR, 25 after.
fn german_broadband() -> Series {
    let values: Vec<Option<f64>> = (0..20)
        .map(|quarter| Some(if quarter < 9 { 30.0 } else { 25.0 }))
        .collect();
    series("DE", "broadband_price", Frequency::Quarterly, "2016-Q1", &values)
}

fn store(series: Vec<Series>) -> SeriesStore {
    let mut store = SeriesStore::new();
    for s in series {
        store.insert(s).unwrap();
    }
    store
}

#[test]
fn german_broadband_price_drops_after_gdpr() {
    let registry = EventRegistry::builtin();
    let catalog = quarterly_catalog();
    let pipeline = ImpactPipeline::new(RegulaConfig::default(), &registry, &catalog).unwrap();
    let report = pipeline.run(&store(vec![german_broadband()])).unwrap();

    // Only GDPR falls inside 2016..2020.
    assert_eq!(report.results.len(), 1);
    assert!(report.skipped.is_empty());

    let result = &report.table.get("broadband_price", "gdpr")[0];
    assert_eq!(result.country, "DE");
    assert_eq!(result.pre_period.to_string(), "2016-Q2..2018-Q1");
    assert_eq!(result.post_period.to_string(), "2018-Q2..2020-Q2");
    assert_eq!(result.pre_mean, Some(30.0));
    assert_eq!(result.post_mean, Some(25.0));
    assert!((result.delta_pct.unwrap() + 0.1667).abs() < 1e-3);
    assert_eq!(result.confidence, Confidence::High);
    // A flat-to-flat shift has no slope change.
    assert!(!result.trend_break_detected);
    assert_eq!(result.confounders, vec!["covid19".to_string()]);
}

#[test]
fn event_after_last_observation_is_a_silent_skip() {
    let registry = EventRegistry::builtin();
    let catalog = quarterly_catalog();
    let pipeline = ImpactPipeline::new(RegulaConfig::default(), &registry, &catalog).unwrap();
    let report = pipeline.run(&store(vec![german_broadband()])).unwrap();

    for event in ["dsa", "dma", "ai_act"] {
        assert!(report.table.get("broadband_price", event).is_empty());
        assert!(
            report
                .skipped
                .iter()
                .all(|pair| pair.event_id.as_deref() != Some(event))
        );
    }
}

#[test]
fn two_pre_values_are_insufficient_despite_rich_post_window() {
    // 2018-Q2 is the GDPR period: two quarters before it, ten from it on.
    let values = vec![Some(30.0); 12];
    let s = series("IE", "broadband_price", Frequency::Quarterly, "2017-Q4", &values);
    let registry = EventRegistry::builtin();
    let catalog = quarterly_catalog();
    let pipeline = ImpactPipeline::new(RegulaConfig::default(), &registry, &catalog).unwrap();
    let report = pipeline.run(&store(vec![s])).unwrap();

    let result = &report.table.get("broadband_price", "gdpr")[0];
    assert_eq!(result.pre_count, 2);
    assert_eq!(result.post_count, 9);
    assert_eq!(result.confidence, Confidence::InsufficientData);
}

#[test]
fn failing_pairs_are_recorded_and_others_proceed() {
    let registry = EventRegistry::builtin();
    let catalog = quarterly_catalog();
    // Annual traffic totals cannot be split into quarters.
    let traffic = series(
        "DE",
        "broadband_traffic",
        Frequency::Annual,
        "2015",
        &[Some(10.0), Some(11.0), Some(12.0), Some(13.0), Some(14.0)],
    );
    let unknown = series("DE", "mystery", Frequency::Quarterly, "2017-Q1", &[Some(1.0); 8]);
    let pipeline = ImpactPipeline::new(RegulaConfig::default(), &registry, &catalog).unwrap();
    let report = pipeline
        .run(&store(vec![german_broadband(), traffic, unknown]))
        .unwrap();

    assert_eq!(report.results.len(), 1);
    // One alignment failure (GDPR only; later events lie outside the traffic
    // span) and one unknown-metric failure per applicable event.
    assert_eq!(report.skipped.len(), 5);
    assert_eq!(report.skipped[0].metric_id, "broadband_traffic");
    assert!(report.skipped[0].reason.contains("disaggregate"));
    assert_eq!(report.skipped[1].reason, "unknown metric: mystery");
    assert_eq!(report.skipped[1].event_id.as_deref(), Some("gdpr"));
}

#[test]
fn annual_series_under_quarterly_metric_is_skipped() {
    let registry = EventRegistry::builtin();
    let catalog = quarterly_catalog();
    let annual = series(
        "DE",
        "broadband_price",
        Frequency::Annual,
        "2016",
        &[Some(30.0), Some(30.0), Some(25.0), Some(25.0), Some(25.0)],
    );
    let pipeline = ImpactPipeline::new(RegulaConfig::default(), &registry, &catalog).unwrap();
    let report = pipeline.run(&store(vec![annual])).unwrap();

    assert!(report.results.is_empty());
    let gdpr: Vec<_> = report
        .skipped
        .iter()
        .filter(|pair| pair.event_id.as_deref() == Some("gdpr"))
        .collect();
    assert_eq!(gdpr.len(), 1);
    assert!(gdpr[0].reason.contains("coarser than the quarterly metric"));
}

#[test]
fn identical_runs_are_identical() {
    let registry = EventRegistry::builtin();
    let catalog = quarterly_catalog();
    let mut config = RegulaConfig::default();
    config.pipeline.worker_threads = 4;
    let input = || {
        store(vec![
            german_broadband(),
            series(
                "FR",
                "broadband_price",
                Frequency::Monthly,
                "2016-01",
                &(0..60).map(|m| Some(f64::from(m) * 0.1 + 20.0)).collect::<Vec<_>>(),
            ),
            series("AT", "broadband_price", Frequency::Quarterly, "2016-Q1", &[Some(40.0); 28]),
        ])
    };

    let pipeline = ImpactPipeline::new(config, &registry, &catalog).unwrap();
    let first = pipeline.run(&input()).unwrap();
    let second = pipeline.run(&input()).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(first, second);
}

#[test]
fn country_order_drives_rows() {
    let registry = EventRegistry::builtin();
    let catalog = quarterly_catalog();
    let mut config = RegulaConfig::default();
    config.pipeline.country_order = vec!["IE".into(), "DE".into()];
    let ie = series("IE", "broadband_price", Frequency::Quarterly, "2016-Q1", &[Some(50.0); 20]);
    let pipeline = ImpactPipeline::new(config, &registry, &catalog).unwrap();
    let report = pipeline.run(&store(vec![german_broadband(), ie])).unwrap();

    let rows: Vec<&str> = report
        .table
        .get("broadband_price", "gdpr")
        .iter()
        .map(|r| r.country.as_str())
        .collect();
    assert_eq!(rows, vec!["IE", "DE"]);
    assert_eq!(report.results[0].country, "IE");
}

#[test]
fn growth_measure_analyses_derived_series() {
    let registry = EventRegistry::builtin();
    let catalog = quarterly_catalog();
    let mut config = RegulaConfig::default();
    config.analysis.measure = Measure::GrowthRate;
    config.pipeline.group_by = GroupBy::Country;
    let pipeline = ImpactPipeline::new(config, &registry, &catalog).unwrap();
    let report = pipeline.run(&store(vec![german_broadband()])).unwrap();

    let result = &report.results[0];
    assert_eq!(result.metric_id, "broadband_price:growth");
    assert_eq!(result.pre_mean, Some(0.0));
    assert_eq!(result.delta_pct, None);
    assert_eq!(report.table.groups[0].key.country.as_deref(), Some("DE"));
}

#[test]
fn invalid_configuration_fails_before_running() {
    let registry = EventRegistry::builtin();
    let catalog = quarterly_catalog();
    let mut config = RegulaConfig::default();
    config.analysis.min_observations = 1;
    let err = ImpactPipeline::new(config, &registry, &catalog).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Configuration(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn min_observations_flags_every_thin_window() {
    let registry = EventRegistry::builtin();
    let catalog = quarterly_catalog();
    let mut config = RegulaConfig::default();
    config.analysis.min_observations = 6;
    // Every other quarter missing: four values per eight-quarter pre window.
    let values: Vec<Option<f64>> = (0..20)
        .map(|q| (q % 2 == 0).then_some(30.0))
        .collect();
    let sparse = series("DE", "broadband_price", Frequency::Quarterly, "2016-Q1", &values);
    let pipeline = ImpactPipeline::new(config, &registry, &catalog).unwrap();
    let report = pipeline.run(&store(vec![sparse])).unwrap();
    assert_eq!(report.results[0].confidence, Confidence::InsufficientData);
}
