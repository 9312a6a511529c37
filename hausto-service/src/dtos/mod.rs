pub mod analysis;
pub mod auth;

pub use analysis::AnalyzePropertyRequest;
pub use auth::ExchangeCodeRequest;
