use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `rgl` binary.
#[derive(Debug, Parser)]
#[command(
    name = "rgl",
    version,
    about = "Regula - regulatory impact analysis over economic time series"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file layered above the discovered config files
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::{CommandFactory, Parser};
    use reg_core::{EventCategory, Frequency};

    use super::root_commands::{GroupByArg, MeasureArg};
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["rgl", "--format", "table", "--verbose", "metrics"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Metrics));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["rgl", "metrics", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["rgl", "--format", "xml", "metrics"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn config_path_is_carried_into_global_flags() {
        let cli = Cli::try_parse_from(["rgl", "config", "--config", "/tmp/regula.toml"])
            .expect("cli should parse");
        let flags = cli.global_flags();
        assert_eq!(flags.config.as_deref(), Some(Path::new("/tmp/regula.toml")));
    }

    #[test]
    fn run_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "rgl",
            "run",
            "--input",
            "data.jsonl",
            "--group-by",
            "country",
            "--country-order",
            "DE,IE",
            "--measure",
            "growth-rate",
        ])
        .expect("cli should parse");

        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.input, Path::new("data.jsonl"));
        assert_eq!(args.group_by, Some(GroupByArg::Country));
        assert_eq!(args.country_order, vec!["DE", "IE"]);
        assert_eq!(args.measure, Some(MeasureArg::GrowthRate));
    }

    #[test]
    fn run_requires_input() {
        assert!(Cli::try_parse_from(["rgl", "run"]).is_err());
    }

    #[test]
    fn events_category_parses_through_core_names() {
        let cli = Cli::try_parse_from([
            "rgl",
            "events",
            "--country",
            "DE",
            "--category",
            "data-protection",
        ])
        .expect("cli should parse");

        let Commands::Events(args) = cli.command else {
            panic!("expected events");
        };
        assert_eq!(args.country.as_deref(), Some("DE"));
        assert_eq!(args.category, Some(EventCategory::DataProtection));
    }

    #[test]
    fn profile_radius_defaults_to_two() {
        let cli = Cli::try_parse_from([
            "rgl", "profile", "--input", "d.jsonl", "--country", "DE", "--metric", "gerd",
            "--event", "gdpr",
        ])
        .expect("cli should parse");

        let Commands::Profile(args) = cli.command else {
            panic!("expected profile");
        };
        assert_eq!(args.radius, 2);
    }

    #[test]
    fn resample_target_uses_frequency_names() {
        let cli = Cli::try_parse_from([
            "rgl", "resample", "--input", "d.jsonl", "--country", "DE", "--metric", "vpn_searches",
            "--to", "quarterly",
        ])
        .expect("cli should parse");

        let Commands::Resample(args) = cli.command else {
            panic!("expected resample");
        };
        assert_eq!(args.to, Frequency::Quarterly);
    }
}
