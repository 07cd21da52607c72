use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use reg_config::Measure;
use reg_core::{EventCategory, Frequency, GroupBy};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Estimate every (series, event) pair in an observation file.
    Run(RunArgs),
    /// List regulatory events, optionally for one country.
    Events(EventsArgs),
    /// List the metric catalog.
    Metrics,
    /// Series values around one event, by offset from the event period.
    Profile(ProfileArgs),
    /// Resample one series to another frequency.
    Resample(ResampleArgs),
    /// Print the effective configuration.
    Config,
    /// Print the JSON Schema of an output type.
    Schema(SchemaArgs),
}

/// Arguments for `rgl run`.
#[derive(Clone, Debug, Args)]
pub struct RunArgs {
    /// JSONL file with one observation per line
    #[arg(short, long)]
    pub input: PathBuf,
    /// Comparison table grouping (overrides `pipeline.group_by`)
    #[arg(long, value_enum)]
    pub group_by: Option<GroupByArg>,
    /// Caller country ordering, comma separated (overrides `pipeline.country_order`)
    #[arg(long, value_delimiter = ',')]
    pub country_order: Vec<String>,
    /// Compared quantity (overrides `analysis.measure`)
    #[arg(long, value_enum)]
    pub measure: Option<MeasureArg>,
}

/// Arguments for `rgl events`.
#[derive(Clone, Debug, Args)]
pub struct EventsArgs {
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub category: Option<EventCategory>,
    /// List context periods instead of events
    #[arg(long)]
    pub context: bool,
}

/// Arguments for `rgl profile`.
#[derive(Clone, Debug, Args)]
pub struct ProfileArgs {
    #[arg(short, long)]
    pub input: PathBuf,
    #[arg(long)]
    pub country: String,
    #[arg(long)]
    pub metric: String,
    #[arg(long)]
    pub event: String,
    /// Source id; defaults to the primary source
    #[arg(long)]
    pub source: Option<String>,
    /// Canonical periods on each side of the event period
    #[arg(long, default_value_t = 2)]
    pub radius: u32,
}

/// Arguments for `rgl resample`.
#[derive(Clone, Debug, Args)]
pub struct ResampleArgs {
    #[arg(short, long)]
    pub input: PathBuf,
    #[arg(long)]
    pub country: String,
    #[arg(long)]
    pub metric: String,
    #[arg(long)]
    pub source: Option<String>,
    /// Target frequency: annual, quarterly, monthly
    #[arg(long)]
    pub to: Frequency,
    /// Longest gap carried forward (overrides `resample.max_carry_forward_gap`)
    #[arg(long)]
    pub max_gap: Option<u32>,
}

/// Arguments for `rgl schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Output type name; `list` prints the known names
    pub type_name: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum GroupByArg {
    MetricEvent,
    Metric,
    Event,
    Country,
}

impl From<GroupByArg> for GroupBy {
    fn from(value: GroupByArg) -> Self {
        match value {
            GroupByArg::MetricEvent => Self::MetricEvent,
            GroupByArg::Metric => Self::Metric,
            GroupByArg::Event => Self::Event,
            GroupByArg::Country => Self::Country,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum MeasureArg {
    Level,
    GrowthRate,
}

impl From<MeasureArg> for Measure {
    fn from(value: MeasureArg) -> Self {
        match value {
            MeasureArg::Level => Self::Level,
            MeasureArg::GrowthRate => Self::GrowthRate,
        }
    }
}
