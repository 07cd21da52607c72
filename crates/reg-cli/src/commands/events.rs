use reg_core::{Event, EventCategory};
use reg_registry::EventRegistry;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::EventsArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `rgl events`.
pub fn handle(args: &EventsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if args.context {
        return output(&ctx.registry.context_periods(), flags.format);
    }
    let events = select(&ctx.registry, args.country.as_deref(), args.category);
    output(&events, flags.format)
}

fn select<'a>(
    registry: &'a EventRegistry,
    country: Option<&str>,
    category: Option<EventCategory>,
) -> Vec<&'a Event> {
    match country {
        Some(country) => registry.events_for(country, category),
        None => registry
            .all_events()
            .iter()
            .filter(|event| category.is_none_or(|category| event.category == category))
            .collect(),
    }
}
