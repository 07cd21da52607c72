use anyhow::{Context, anyhow};
use reg_series::ResampleOptions;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ResampleArgs;
use crate::context::AppContext;
use crate::loader::load_input;
use crate::output::output;

/// Handle `rgl resample`.
///
/// Uses the metric's aggregation kind and carries values across gaps of at
/// most `resample.max_carry_forward_gap` periods.
pub fn handle(args: &ResampleArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let metric = ctx
        .catalog
        .get(&args.metric)
        .ok_or_else(|| anyhow!("unknown metric: {}", args.metric))?;

    let input = load_input(&args.input)
        .with_context(|| format!("failed to read observations from {}", args.input.display()))?;
    let series = match &args.source {
        Some(source) => input.store.get_from(&args.country, &args.metric, source)?,
        None => input.store.get(&args.country, &args.metric)?,
    };

    let max_gap = args
        .max_gap
        .unwrap_or(ctx.config.resample.max_carry_forward_gap);
    let options = ResampleOptions::new(metric.aggregation_kind, max_gap);
    let resampled = input.store.resample(series, args.to, options)?;
    output(&resampled.observations(), flags.format)
}
