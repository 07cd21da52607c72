//! Calendar periods at annual, quarterly, and monthly frequency.
//!
//! A [`Period`] is stored as an ordinal (`year * periods_per_year + index`),
//! so period arithmetic is integer arithmetic and consecutive periods of one
//! frequency differ by exactly one. Textual forms:
//!
//! ```text
//! annual     2018
//! quarterly  2018-Q2
//! monthly    2018-05
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

// ---------------------------------------------------------------------------
// Frequency
// ---------------------------------------------------------------------------

/// Sampling interval of a series. Declared coarse to fine, so the derived
/// ordering sorts by granularity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Annual,
    Quarterly,
    Monthly,
}

impl Frequency {
    #[must_use]
    pub const fn periods_per_year(self) -> i64 {
        match self {
            Self::Annual => 1,
            Self::Quarterly => 4,
            Self::Monthly => 12,
        }
    }

    #[must_use]
    pub const fn months_per_period(self) -> u32 {
        match self {
            Self::Annual => 12,
            Self::Quarterly => 3,
            Self::Monthly => 1,
        }
    }

    /// Whether one period of `self` spans several periods of `other`.
    #[must_use]
    pub const fn is_coarser_than(self, other: Self) -> bool {
        self.periods_per_year() < other.periods_per_year()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarterly => "quarterly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annual" | "yearly" | "a" => Ok(Self::Annual),
            "quarterly" | "q" => Ok(Self::Quarterly),
            "monthly" | "m" => Ok(Self::Monthly),
            other => Err(CoreError::Validation(format!("unknown frequency '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// One calendar period at a given frequency.
///
/// Ordering compares frequency first, then position in time; only periods of
/// the same frequency are meaningfully comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    frequency: Frequency,
    ordinal: i64,
}

impl Period {
    /// Build a period from a year and a 1-based sub-period index
    /// (quarter 1..=4, month 1..=12, always 1 for annual).
    pub fn new(frequency: Frequency, year: i32, sub: u32) -> Result<Self, CoreError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(CoreError::InvalidPeriod(format!(
                "year {year} is outside {MIN_YEAR}..={MAX_YEAR}"
            )));
        }
        let per_year = frequency.periods_per_year();
        if sub == 0 || i64::from(sub) > per_year {
            return Err(CoreError::InvalidPeriod(format!(
                "sub-period {sub} is out of range for {frequency} frequency"
            )));
        }
        Ok(Self {
            frequency,
            ordinal: i64::from(year) * per_year + i64::from(sub - 1),
        })
    }

    pub fn annual(year: i32) -> Result<Self, CoreError> {
        Self::new(Frequency::Annual, year, 1)
    }

    pub fn quarter(year: i32, quarter: u32) -> Result<Self, CoreError> {
        Self::new(Frequency::Quarterly, year, quarter)
    }

    pub fn month(year: i32, month: u32) -> Result<Self, CoreError> {
        Self::new(Frequency::Monthly, year, month)
    }

    /// The period of `frequency` that contains `date`.
    #[must_use]
    pub fn containing(date: NaiveDate, frequency: Frequency) -> Self {
        let sub = date.month0() / frequency.months_per_period();
        Self {
            frequency,
            ordinal: i64::from(date.year()) * frequency.periods_per_year() + i64::from(sub),
        }
    }

    #[must_use]
    pub const fn frequency(self) -> Frequency {
        self.frequency
    }

    #[must_use]
    pub const fn ordinal(self) -> i64 {
        self.ordinal
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn year(self) -> i32 {
        self.ordinal.div_euclid(self.frequency.periods_per_year()) as i32
    }

    /// 1-based index within the year.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn sub(self) -> u32 {
        (self.ordinal.rem_euclid(self.frequency.periods_per_year()) + 1) as u32
    }

    /// First calendar day of the period.
    #[must_use]
    pub fn start_date(self) -> NaiveDate {
        let month = (self.sub() - 1) * self.frequency.months_per_period() + 1;
        NaiveDate::from_ymd_opt(self.year(), month, 1).unwrap_or(if self.ordinal < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
    }

    /// Last calendar day of the period.
    #[must_use]
    pub fn end_date(self) -> NaiveDate {
        self.next()
            .start_date()
            .checked_sub_days(Days::new(1))
            .unwrap_or(NaiveDate::MAX)
    }

    #[must_use]
    pub fn contains_date(self, date: NaiveDate) -> bool {
        self.start_date() <= date && date <= self.end_date()
    }

    /// Shift by `periods` periods of the same frequency.
    #[must_use]
    pub const fn offset(self, periods: i64) -> Self {
        Self {
            frequency: self.frequency,
            ordinal: self.ordinal + periods,
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        self.offset(1)
    }

    #[must_use]
    pub const fn prev(self) -> Self {
        self.offset(-1)
    }

    /// Number of periods from `self` to `later`. Both must share a frequency.
    #[must_use]
    pub const fn periods_until(self, later: Self) -> i64 {
        later.ordinal - self.ordinal
    }

    /// The period of `target` frequency containing this period's start date.
    #[must_use]
    pub fn to_frequency(self, target: Frequency) -> Self {
        Self::containing(self.start_date(), target)
    }

    /// All periods of `target` frequency that fall inside this period.
    ///
    /// For a target that is not finer than `self`, this is the single
    /// containing period.
    #[must_use]
    pub fn sub_periods(self, target: Frequency) -> Vec<Self> {
        if !self.frequency.is_coarser_than(target) {
            return vec![self.to_frequency(target)];
        }
        let first = Self::containing(self.start_date(), target);
        let last = Self::containing(self.end_date(), target);
        (first.ordinal..=last.ordinal)
            .map(|ordinal| Self {
                frequency: target,
                ordinal,
            })
            .collect()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.frequency {
            Frequency::Annual => write!(f, "{}", self.year()),
            Frequency::Quarterly => write!(f, "{}-Q{}", self.year(), self.sub()),
            Frequency::Monthly => write!(f, "{}-{:02}", self.year(), self.sub()),
        }
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || CoreError::InvalidPeriod(format!("cannot parse '{s}'"));
        let parse_year = |text: &str| {
            if text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit()) {
                text.parse::<i32>().map_err(|_| invalid())
            } else {
                Err(invalid())
            }
        };

        match s.split_once('-') {
            None => Self::annual(parse_year(s)?),
            Some((year, rest)) => {
                let year = parse_year(year)?;
                if let Some(quarter) = rest.strip_prefix(['Q', 'q']) {
                    let quarter = quarter.parse::<u32>().map_err(|_| invalid())?;
                    Self::quarter(year, quarter)
                } else if rest.len() == 2 {
                    let month = rest.parse::<u32>().map_err(|_| invalid())?;
                    Self::month(year, month)
                } else {
                    Err(invalid())
                }
            }
        }
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

impl TryFrom<String> for Period {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl JsonSchema for Period {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("Period")
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "description": "Calendar period: YYYY, YYYY-Qn, or YYYY-MM",
            "pattern": "^[0-9]{4}(-Q[1-4]|-(0[1-9]|1[0-2]))?$"
        })
    }
}
