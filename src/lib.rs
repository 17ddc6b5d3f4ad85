pub mod chat;
pub mod config;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience.
pub use chat::{ChatSession, InteractionRequest, TurnAnswer, TurnOutcome};
pub use models::{AnalyticsQuery, AnalyticsResult, AnalyticsRow, DateRange, Site};
