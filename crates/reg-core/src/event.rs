//! Regulatory events and known confounding periods.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// EventCategory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    DataProtection,
    PlatformRegulation,
    Competition,
    ArtificialIntelligence,
    Other,
}

impl EventCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DataProtection => "data_protection",
            Self::PlatformRegulation => "platform_regulation",
            Self::Competition => "competition",
            Self::ArtificialIntelligence => "artificial_intelligence",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "data_protection" => Ok(Self::DataProtection),
            "platform_regulation" => Ok(Self::PlatformRegulation),
            "competition" => Ok(Self::Competition),
            "artificial_intelligence" => Ok(Self::ArtificialIntelligence),
            "other" => Ok(Self::Other),
            other => Err(CoreError::Validation(format!(
                "unknown event category '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Applicability
// ---------------------------------------------------------------------------

/// Which countries an event applies to.
///
/// Serialized as the string `"all"` or as a list of ISO country codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ApplicabilityRepr", into = "ApplicabilityRepr")]
pub enum Applicability {
    All,
    Countries(BTreeSet<String>),
}

impl Applicability {
    /// Country list, normalized to upper case.
    #[must_use]
    pub fn countries<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Countries(
            codes
                .into_iter()
                .map(|code| code.as_ref().trim().to_ascii_uppercase())
                .collect(),
        )
    }

    #[must_use]
    pub fn applies_to(&self, country: &str) -> bool {
        match self {
            Self::All => true,
            Self::Countries(codes) => codes.contains(&country.trim().to_ascii_uppercase()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ApplicabilityRepr {
    Keyword(String),
    Countries(Vec<String>),
}

impl TryFrom<ApplicabilityRepr> for Applicability {
    type Error = CoreError;

    fn try_from(repr: ApplicabilityRepr) -> Result<Self, Self::Error> {
        match repr {
            ApplicabilityRepr::Keyword(word) if word.eq_ignore_ascii_case("all") => Ok(Self::All),
            ApplicabilityRepr::Keyword(word) => Err(CoreError::Validation(format!(
                "applicability must be \"all\" or a list of country codes, got '{word}'"
            ))),
            ApplicabilityRepr::Countries(codes) => Ok(Self::countries(codes)),
        }
    }
}

impl From<Applicability> for ApplicabilityRepr {
    fn from(value: Applicability) -> Self {
        match value {
            Applicability::All => Self::Keyword("all".to_string()),
            Applicability::Countries(codes) => Self::Countries(codes.into_iter().collect()),
        }
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A regulatory event with the date it took effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub name: String,
    pub effective_date: NaiveDate,
    pub applicability: Applicability,
    pub category: EventCategory,
}

impl Event {
    #[must_use]
    pub fn applies_to(&self, country: &str) -> bool {
        self.applicability.applies_to(country)
    }
}

// ---------------------------------------------------------------------------
// ContextPeriod
// ---------------------------------------------------------------------------

/// A known confounding span (e.g. the COVID-19 pandemic). Inclusive bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextPeriod {
    pub id: String,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ContextPeriod {
    #[must_use]
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start <= end && start <= self.end
    }
}
