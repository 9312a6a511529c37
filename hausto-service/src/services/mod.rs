pub mod analysis;
pub mod identity;
pub mod metrics;
pub mod providers;

pub use analysis::PropertyAnalyzer;
pub use identity::{GoogleIdentityClient, IdentityError, IdentityProvider};
