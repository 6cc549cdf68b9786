//! Advisory CRM - registration intake, GP/LP matching and investor pipeline
//!
//! This library holds the scoring engine that pairs fund managers (GPs) with
//! investors (LPs), the Kanban pipeline those investors move through, CSV
//! export of registrations and the HTTP surface the admin dashboard uses.

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_match_score, export_csv, Matcher, MatchResult, StrategyTag};
pub use error::ApiError;
pub use models::{GpRecord, LpRecord, PipelineStage, ScoredMatch, ScoringWeights};
pub use routes::AppState;
