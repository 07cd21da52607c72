use anyhow::Context;
use reg_config::RegulaConfig;
use reg_core::ImpactReport;
use reg_engine::ImpactPipeline;

use crate::cli::root_commands::RunArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::loader::load_input;
use crate::output::output;

/// Handle `rgl run`.
pub fn handle(args: &RunArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = apply_overrides(ctx.config.clone(), args);
    let input = load_input(&args.input)
        .with_context(|| format!("failed to read observations from {}", args.input.display()))?;

    let pipeline = ImpactPipeline::new(config, &ctx.registry, &ctx.catalog)?;
    let mut report = pipeline.run(&input.store)?;
    let mut skipped = input.rejected;
    skipped.append(&mut report.skipped);
    report.skipped = skipped;

    match flags.format {
        OutputFormat::Table => output_tables(&report, flags.format),
        OutputFormat::Json | OutputFormat::Raw => output(&report, flags.format),
    }
}

fn apply_overrides(mut config: RegulaConfig, args: &RunArgs) -> RegulaConfig {
    if let Some(group_by) = args.group_by {
        config.pipeline.group_by = group_by.into();
    }
    if !args.country_order.is_empty() {
        config.pipeline.country_order.clone_from(&args.country_order);
    }
    if let Some(measure) = args.measure {
        config.analysis.measure = measure.into();
    }
    config
}

/// Table mode prints the comparison rows, then any skipped pairs.
fn output_tables(report: &ImpactReport, format: OutputFormat) -> anyhow::Result<()> {
    for group in &report.table.groups {
        println!("== {}", group.key);
        output(&group.results, format)?;
    }
    if !report.skipped.is_empty() {
        println!("== skipped");
        output(&report.skipped, format)?;
    }
    Ok(())
}
