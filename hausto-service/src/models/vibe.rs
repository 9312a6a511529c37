use serde::{Deserialize, Serialize};
use std::fmt;

/// How well a property matches a stated preference, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VibeTier {
    Casual,
    Good,
    Strong,
    Perfect,
}

impl VibeTier {
    /// Keywords in the order they are checked. The first keyword found
    /// anywhere in the text decides the tier, regardless of its position.
    const KEYWORDS: [(&'static str, VibeTier); 3] = [
        ("perfect", VibeTier::Perfect),
        ("strong", VibeTier::Strong),
        ("good", VibeTier::Good),
    ];

    /// Map free model text to a tier by case-insensitive substring search.
    ///
    /// This is literal matching: "not a good match" still yields `Good`.
    pub fn classify(text: &str) -> Self {
        let lowered = text.to_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, tier)| *tier)
            .unwrap_or(VibeTier::Casual)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VibeTier::Casual => "Casual",
            VibeTier::Good => "Good",
            VibeTier::Strong => "Strong",
            VibeTier::Perfect => "Perfect",
        }
    }
}

impl fmt::Display for VibeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
