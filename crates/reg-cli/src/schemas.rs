//! JSON Schemas of the types `rgl` prints and reads.

use std::collections::BTreeMap;

use reg_core::{
    ComparisonTable, ImpactReport, ImpactResult, Metric, Observation, ProfilePoint, SkippedPair,
};
use schemars::{Schema, schema_for};

macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, schema_for!($ty));
    };
}

/// Output and input schemas by name.
pub struct SchemaRegistry {
    schemas: BTreeMap<&'static str, Schema>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = BTreeMap::new();
        register!(schemas, "impact_report", ImpactReport);
        register!(schemas, "impact_result", ImpactResult);
        register!(schemas, "comparison_table", ComparisonTable);
        register!(schemas, "skipped_pair", SkippedPair);
        register!(schemas, "profile_point", ProfilePoint);
        register!(schemas, "observation", Observation);
        register!(schemas, "metric", Metric);
        Self { schemas }
    }

    /// Look up a schema; `-` and `_` are interchangeable in `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name.replace('-', "_").as_str())
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        self.schemas.keys().copied().collect()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
