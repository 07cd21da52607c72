//! The event registry: regulatory events and known confounding periods.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use reg_core::{Applicability, ContextPeriod, Event, EventCategory};
use serde::Deserialize;

use crate::error::RegistryError;

/// EU member states (ISO 3166-1 alpha-2; Greece is `GR`).
pub const EU27: [&str; 27] = [
    "AT", "BE", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "IE", "IT", "LV", "LT",
    "LU", "MT", "NL", "PL", "PT", "RO", "SK", "SI", "ES", "SE", "HU",
];

/// EEA members outside the EU that apply the GDPR.
pub const EEA_EFTA: [&str; 3] = ["IS", "LI", "NO"];

/// Immutable catalog of regulatory events, kept in chronological order.
///
/// Built once and shared by reference; there is no process-wide instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventRegistry {
    events: Vec<Event>,
    context: Vec<ContextPeriod>,
}

#[derive(Debug, Deserialize)]
struct EventsDocument {
    #[serde(default)]
    events: Vec<Event>,
    #[serde(default)]
    context_periods: Vec<ContextPeriod>,
}

impl EventRegistry {
    /// Build a registry, rejecting duplicate ids and inverted context periods.
    ///
    /// Events are sorted by effective date, ties broken by event id.
    pub fn new(
        mut events: Vec<Event>,
        mut context: Vec<ContextPeriod>,
    ) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for event in &events {
            if !seen.insert(event.event_id.as_str()) {
                return Err(RegistryError::DuplicateId {
                    kind: "event",
                    id: event.event_id.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for period in &context {
            if !seen.insert(period.id.as_str()) {
                return Err(RegistryError::DuplicateId {
                    kind: "context period",
                    id: period.id.clone(),
                });
            }
            if period.end < period.start {
                return Err(RegistryError::InvalidContextPeriod {
                    id: period.id.clone(),
                    start: period.start,
                    end: period.end,
                });
            }
        }

        events.sort_by(|a, b| {
            a.effective_date
                .cmp(&b.effective_date)
                .then_with(|| a.event_id.cmp(&b.event_id))
        });
        context.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));

        tracing::debug!(
            events = events.len(),
            context_periods = context.len(),
            "event registry built"
        );
        Ok(Self { events, context })
    }

    /// The EU digital-regulation events and the COVID-19 context period.
    #[must_use]
    pub fn builtin() -> Self {
        let eu = || Applicability::countries(EU27);
        let events = vec![
            event(
                "gdpr",
                "General Data Protection Regulation",
                date(2018, 5, 25),
                Applicability::countries(EU27.iter().chain(EEA_EFTA.iter())),
                EventCategory::DataProtection,
            ),
            event(
                "dsa",
                "Digital Services Act",
                date(2022, 11, 16),
                eu(),
                EventCategory::PlatformRegulation,
            ),
            event(
                "dma",
                "Digital Markets Act",
                date(2023, 5, 2),
                eu(),
                EventCategory::Competition,
            ),
            event(
                "ai_act",
                "EU Artificial Intelligence Act",
                date(2025, 2, 2),
                eu(),
                EventCategory::ArtificialIntelligence,
            ),
        ];
        let context = vec![ContextPeriod {
            id: "covid19".to_string(),
            name: "COVID-19 pandemic".to_string(),
            start: date(2020, 3, 11),
            end: date(2023, 5, 1),
        }];
        Self { events, context }
    }

    /// Parse a TOML document with `[[events]]` and `[[context_periods]]`
    /// tables. Dates are quoted ISO strings (`"2018-05-25"`).
    pub fn from_toml_str(source: &str) -> Result<Self, RegistryError> {
        let document: EventsDocument = toml::from_str(source)?;
        Self::new(document.events, document.context_periods)
    }

    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let source = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// All events, chronological.
    #[must_use]
    pub fn all_events(&self) -> &[Event] {
        &self.events
    }

    /// Events applying to `country`, optionally of one category, chronological.
    #[must_use]
    pub fn events_for(&self, country: &str, category: Option<EventCategory>) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|event| event.applies_to(country))
            .filter(|event| category.is_none_or(|wanted| event.category == wanted))
            .collect()
    }

    #[must_use]
    pub fn get(&self, event_id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.event_id == event_id)
    }

    #[must_use]
    pub fn context_periods(&self) -> &[ContextPeriod] {
        &self.context
    }

    /// Context periods overlapping the inclusive span `start..=end`.
    #[must_use]
    pub fn overlapping_context(&self, start: NaiveDate, end: NaiveDate) -> Vec<&ContextPeriod> {
        self.context
            .iter()
            .filter(|period| period.overlaps(start, end))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

fn event(
    id: &str,
    name: &str,
    effective_date: NaiveDate,
    applicability: Applicability,
    category: EventCategory,
) -> Event {
    Event {
        event_id: id.to_string(),
        name: name.to_string(),
        effective_date,
        applicability,
        category,
    }
}

/// Builtin dates are compile-time constants known to be valid.
fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn ids(events: &[&Event]) -> Vec<String> {
        events.iter().map(|event| event.event_id.clone()).collect()
    }

    #[test]
    fn builtin_is_chronological() {
        let registry = EventRegistry::builtin();
        let dates: Vec<NaiveDate> = registry
            .all_events()
            .iter()
            .map(|event| event.effective_date)
            .collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.context_periods().len(), 1);
    }

    #[rstest]
    #[case("DE", &["gdpr", "dsa", "dma", "ai_act"])]
    #[case("no", &["gdpr"])]
    #[case("CH", &[])]
    #[case("US", &[])]
    fn events_follow_applicability(#[case] country: &str, #[case] expected: &[&str]) {
        let registry = EventRegistry::builtin();
        assert_eq!(ids(&registry.events_for(country, None)), expected);
    }

    #[test]
    fn category_filter() {
        let registry = EventRegistry::builtin();
        let found = registry.events_for("IE", Some(EventCategory::Competition));
        assert_eq!(ids(&found), vec!["dma"]);
    }

    #[test]
    fn covid_overlaps_dsa_window() {
        let registry = EventRegistry::builtin();
        let hits = registry.overlapping_context(date(2021, 1, 1), date(2024, 12, 31));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "covid19");
        assert!(
            registry
                .overlapping_context(date(2016, 1, 1), date(2019, 12, 31))
                .is_empty()
        );
    }

    #[test]
    fn ties_are_broken_by_id() {
        let day = date(2020, 1, 1);
        let registry = EventRegistry::new(
            vec![
                event("b", "B", day, Applicability::All, EventCategory::Other),
                event("a", "A", day, Applicability::All, EventCategory::Other),
            ],
            Vec::new(),
        )
        .unwrap();
        assert_eq!(registry.all_events()[0].event_id, "a");
        assert_eq!(registry.all_events()[1].event_id, "b");
    }

    #[test]
    fn duplicate_event_id_is_rejected() {
        let day = date(2020, 1, 1);
        let err = EventRegistry::new(
            vec![
                event("a", "A", day, Applicability::All, EventCategory::Other),
                event("a", "A2", day, Applicability::All, EventCategory::Other),
            ],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateId { kind: "event", .. }));
    }

    #[test]
    fn inverted_context_period_is_rejected() {
        let err = EventRegistry::new(
            Vec::new(),
            vec![ContextPeriod {
                id: "x".into(),
                name: "X".into(),
                start: date(2021, 1, 1),
                end: date(2020, 1, 1),
            }],
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidContextPeriod { .. }));
    }
}
