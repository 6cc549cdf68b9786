// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ApprovalStatus, ContactMessage, DocumentRequest, GpRecord, InvestorMessage, LabelMatching,
    LpRecord, NewGp, NewLp, PipelineStage, QualityBand, QualityThresholds, ScoredMatch,
    ScoringWeights,
};
pub use requests::{
    ApprovalRequest, ContactRequest, DocumentAccessRequest, GpRegistrationRequest,
    LpRegistrationRequest, MatchQuery, MoveStageRequest, PostMessageRequest,
};
pub use responses::{
    BoardColumn, BoardResponse, DocumentAccessResponse, ErrorResponse, HealthResponse,
    MatchListResponse, MessageView, MoveStageResponse, SubmissionResponse, TaxonomyResponse,
    TaxonomyTag,
};
