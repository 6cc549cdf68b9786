use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::domain::{InvestorMessage, LpRecord, PipelineStage, ScoredMatch};

/// Response for the admin match list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchListResponse {
    pub matches: Vec<ScoredMatch>,
    #[serde(rename = "totalPairs")]
    pub total_pairs: usize,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Per-field messages for inline form display
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fields: Option<HashMap<String, Vec<String>>>,
    #[serde(rename = "redirectTo", skip_serializing_if = "Option::is_none", default)]
    pub redirect_to: Option<String>,
}

/// One Kanban column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardColumn {
    pub stage: PipelineStage,
    pub investors: Vec<LpRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardResponse {
    pub columns: Vec<BoardColumn>,
}

/// Result of a Kanban drop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveStageResponse {
    pub investor: LpRecord,
    pub changed: bool,
}

/// Gated document unlocked by a lead capture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAccessResponse {
    #[serde(rename = "requestId")]
    pub request_id: Uuid,
    pub document: String,
    pub url: String,
}

/// Acknowledgement for fire-and-forget forms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub id: Uuid,
}

/// Message as seen by a particular caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    #[serde(flatten)]
    pub message: InvestorMessage,
    #[serde(rename = "fromCurrentUser")]
    pub from_current_user: bool,
}

impl MessageView {
    pub fn for_viewer(message: InvestorMessage, viewer_id: &str) -> Self {
        let from_current_user = message.author_id == viewer_id;
        Self {
            message,
            from_current_user,
        }
    }
}

/// Published strategy vocabulary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyResponse {
    pub version: u32,
    pub tags: Vec<TaxonomyTag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyTag {
    pub label: String,
    pub aliases: Vec<String>,
}
