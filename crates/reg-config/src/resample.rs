//! Series Store resampling settings.

use serde::{Deserialize, Serialize};

const fn default_max_carry_forward_gap() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResampleConfig {
    /// Longest run of missing periods that last-observation-carried-forward
    /// may fill. Longer gaps stay missing.
    #[serde(default = "default_max_carry_forward_gap")]
    pub max_carry_forward_gap: u32,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            max_carry_forward_gap: default_max_carry_forward_gap(),
        }
    }
}
