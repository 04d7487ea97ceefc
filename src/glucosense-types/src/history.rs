use serde::{Deserialize, Serialize};

use crate::GlucoseStatus;

/// A point on the glucose trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub display_time: String,
    pub value: f64,
}

/// A row of the glucose history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub display_time: String,
    pub glucose: f64,
    pub status: GlucoseStatus,
}
