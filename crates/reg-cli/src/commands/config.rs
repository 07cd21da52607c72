use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `rgl config`: the effective, layered configuration.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.config, flags.format)
}
