use anyhow::bail;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;
use crate::schemas::SchemaRegistry;

/// Handle `rgl schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = SchemaRegistry::new();
    if args.type_name == "list" {
        return output(&registry.list(), flags.format);
    }
    let Some(schema) = registry.get(&args.type_name) else {
        bail!(
            "unknown schema type '{}' (known: {})",
            args.type_name,
            registry.list().join(", ")
        );
    };
    output(schema, flags.format)
}
