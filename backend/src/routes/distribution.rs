use serde::{Deserialize, Serialize};

// =========================================================
// Distance histogram types
// =========================================================

/// One fixed distance bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub label: String,
    pub lower_km: f64,
    /// `None` for the open-ended last bucket.
    pub upper_km: Option<f64>,
    pub count: usize,
}
