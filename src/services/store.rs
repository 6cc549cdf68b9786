use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    ApprovalStatus, ContactMessage, ContactRequest, DocumentAccessRequest, DocumentRequest, GpRecord,
    InvestorMessage, LpRecord, NewGp, NewLp, PipelineStage,
};

/// Errors that can occur when reading or writing registration records
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for every table the service touches
///
/// Backends only need equality filters, ordering by a column and
/// select-all. Lists come back newest first; message threads oldest first.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_gp(&self, gp: NewGp) -> Result<GpRecord, StoreError>;

    async fn list_gps(&self) -> Result<Vec<GpRecord>, StoreError>;

    async fn update_gp_approval(&self, id: Uuid, approval: ApprovalStatus) -> Result<GpRecord, StoreError>;

    async fn delete_gp(&self, id: Uuid) -> Result<(), StoreError>;

    async fn insert_lp(&self, lp: NewLp) -> Result<LpRecord, StoreError>;

    async fn list_lps(&self) -> Result<Vec<LpRecord>, StoreError>;

    async fn get_lp(&self, id: Uuid) -> Result<LpRecord, StoreError>;

    async fn update_lp_stage(&self, id: Uuid, stage: PipelineStage) -> Result<(), StoreError>;

    async fn update_lp_approval(&self, id: Uuid, approval: ApprovalStatus) -> Result<(), StoreError>;

    async fn delete_lp(&self, id: Uuid) -> Result<(), StoreError>;

    async fn insert_contact(&self, contact: ContactRequest) -> Result<ContactMessage, StoreError>;

    async fn list_contacts(&self) -> Result<Vec<ContactMessage>, StoreError>;

    async fn insert_document_request(&self, request: DocumentAccessRequest) -> Result<DocumentRequest, StoreError>;

    async fn list_document_requests(&self) -> Result<Vec<DocumentRequest>, StoreError>;

    async fn insert_message(&self, lp_id: Uuid, author_id: &str, body: &str) -> Result<InvestorMessage, StoreError>;

    async fn list_messages(&self, lp_id: Uuid) -> Result<Vec<InvestorMessage>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
