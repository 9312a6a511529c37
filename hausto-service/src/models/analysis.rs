use super::VibeTier;
use serde::{Deserialize, Serialize};

/// Short caption naming the standout feature of one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub url: String,
    pub highlight: String,
}

/// Outcome of a property analysis. `highlights` follows the input image order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub vibe: VibeTier,
    pub explanation: String,
    pub highlights: Vec<Highlight>,
}
