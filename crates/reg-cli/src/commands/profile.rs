use anyhow::{Context, anyhow};
use reg_engine::event_profile;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ProfileArgs;
use crate::context::AppContext;
use crate::loader::load_input;
use crate::output::output;

/// Handle `rgl profile`.
pub fn handle(args: &ProfileArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let event = ctx
        .registry
        .get(&args.event)
        .ok_or_else(|| anyhow!("unknown event: {}", args.event))?;
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

    let points = event_profile(series, event, &metric, args.radius)?;
    output(&points, flags.format)
}
