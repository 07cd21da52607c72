//! Pipeline run settings.

use reg_core::GroupBy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Worker threads for per-(series, event) tasks. `0` uses all cores.
    #[serde(default)]
    pub worker_threads: usize,

    /// Country codes in the order rows should appear. Countries not listed
    /// follow in order of first appearance.
    #[serde(default)]
    pub country_order: Vec<String>,

    /// Grouping of the comparison table.
    #[serde(default)]
    pub group_by: GroupBy,
}
