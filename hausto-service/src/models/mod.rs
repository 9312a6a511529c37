//! Domain models for the hausto service.

pub mod analysis;
pub mod identity;
pub mod vibe;

pub use analysis::{AnalysisResult, Highlight};
pub use identity::IdentityProfile;
pub use vibe::VibeTier;
