use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Run(args) => commands::run::handle(&args, ctx, flags),
        Commands::Events(args) => commands::events::handle(&args, ctx, flags),
        Commands::Metrics => commands::metrics::handle(ctx, flags),
        Commands::Profile(args) => commands::profile::handle(&args, ctx, flags),
        Commands::Resample(args) => commands::resample::handle(&args, ctx, flags),
        Commands::Config => commands::config::handle(ctx, flags),
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
