use serde::{Deserialize, Serialize};

const DEFAULT_STATUS_HISTORY: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShifterConfig {
    /// Prefix of every status summary, e.g. "Shifter: Added 2 Vertices".
    pub report_prefix: String,
    /// Apply the shift as soon as the vector changes. When off, shift
    /// commands only store the value until `apply_pending` runs.
    pub apply_on_change: bool,
    /// Outcomes retained by the status log; 0 keeps everything.
    pub status_history: usize,
}

impl Default for ShifterConfig {
    fn default() -> Self {
        Self {
            report_prefix: "Shifter".to_string(),
            apply_on_change: true,
            status_history: DEFAULT_STATUS_HISTORY,
        }
    }
}

impl ShifterConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
