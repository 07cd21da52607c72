use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `rgl metrics`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.catalog.metrics(), flags.format)
}
