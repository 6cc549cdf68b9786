use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// General Partner registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub firm: String,
    #[serde(rename = "aumBracket", alias = "aum_bracket", default)]
    pub aum_bracket: String,
    #[serde(default)]
    pub strategies: Vec<String>,
    #[serde(rename = "fundInMarket", alias = "fund_in_market", default)]
    pub fund_in_market: Option<String>,
    #[serde(default)]
    pub approval: ApprovalStatus,
    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Limited Partner registration, also the unit moved on the pipeline board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub organization: String,
    #[serde(rename = "investorType", alias = "investor_type", default)]
    pub investor_type: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub stage: PipelineStage,
    #[serde(default)]
    pub approval: ApprovalStatus,
    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// GP fields supplied by the registration form, before the store assigns an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewGp {
    pub name: String,
    pub email: String,
    pub firm: String,
    pub aum_bracket: String,
    pub strategies: Vec<String>,
    pub fund_in_market: Option<String>,
}

/// LP fields supplied by the registration form
#[derive(Debug, Clone, PartialEq)]
pub struct NewLp {
    pub name: String,
    pub email: String,
    pub organization: String,
    pub investor_type: Option<String>,
    pub interests: Vec<String>,
    pub jurisdiction: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            other => Err(format!("unknown approval status: {}", other)),
        }
    }
}

/// Investor relationship stages, in board column order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PipelineStage {
    #[default]
    #[serde(rename = "To Contact")]
    ToContact,
    #[serde(rename = "Contacted")]
    Contacted,
    #[serde(rename = "Interested")]
    Interested,
    #[serde(rename = "Meeting Scheduled")]
    MeetingScheduled,
    #[serde(rename = "In Negotiation")]
    InNegotiation,
    #[serde(rename = "Closed")]
    Closed,
    #[serde(rename = "Not Interested")]
    NotInterested,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 7] = [
        PipelineStage::ToContact,
        PipelineStage::Contacted,
        PipelineStage::Interested,
        PipelineStage::MeetingScheduled,
        PipelineStage::InNegotiation,
        PipelineStage::Closed,
        PipelineStage::NotInterested,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::ToContact => "To Contact",
            PipelineStage::Contacted => "Contacted",
            PipelineStage::Interested => "Interested",
            PipelineStage::MeetingScheduled => "Meeting Scheduled",
            PipelineStage::InNegotiation => "In Negotiation",
            PipelineStage::Closed => "Closed",
            PipelineStage::NotInterested => "Not Interested",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PipelineStage::ALL
            .iter()
            .copied()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown pipeline stage: {}", s))
    }
}

/// Message submitted through the public contact form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    pub message: String,
    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Lead captured in exchange for access to a gated document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    pub document: String,
    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// One entry in an investor's message thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorMessage {
    pub id: Uuid,
    #[serde(rename = "lpId", alias = "lp_id")]
    pub lp_id: Uuid,
    #[serde(rename = "authorId", alias = "author_id")]
    pub author_id: String,
    pub body: String,
    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Scored GP/LP pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    #[serde(rename = "gpId")]
    pub gp_id: Uuid,
    #[serde(rename = "gpName")]
    pub gp_name: String,
    #[serde(rename = "gpFirm")]
    pub gp_firm: String,
    #[serde(rename = "lpId")]
    pub lp_id: Uuid,
    #[serde(rename = "lpName")]
    pub lp_name: String,
    #[serde(rename = "lpOrganization")]
    pub lp_organization: String,
    pub score: u32,
    pub reasons: Vec<String>,
    pub quality: QualityBand,
}

/// Presentation band for a match score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityBand {
    #[serde(rename = "Excellent")]
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Fair")]
    Fair,
}

impl QualityBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityBand::Excellent => "Excellent",
            QualityBand::VeryGood => "Very Good",
            QualityBand::Good => "Good",
            QualityBand::Fair => "Fair",
        }
    }
}

/// Points awarded by each scoring rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub strategy_overlap: u32,
    pub institutional_large_aum: u32,
    pub family_office_small_aum: u32,
    pub active_fundraising: u32,
    pub jurisdiction: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            strategy_overlap: 30,
            institutional_large_aum: 25,
            family_office_small_aum: 20,
            active_fundraising: 15,
            jurisdiction: 10,
        }
    }
}

/// Lower bounds of the quality bands, evaluated highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityThresholds {
    pub excellent: u32,
    pub very_good: u32,
    pub good: u32,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            excellent: 70,
            very_good: 50,
            good: 30,
        }
    }
}

/// How strategy and interest labels are compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMatching {
    /// Case-insensitive containment in either direction
    #[default]
    Substring,
    /// Exact intersection after normalizing through the strategy taxonomy
    Taxonomy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_round_trips_display_name() {
        for stage in PipelineStage::ALL {
            assert_eq!(stage.as_str().parse::<PipelineStage>(), Ok(stage));
        }
        assert_eq!("meeting scheduled".parse(), Ok(PipelineStage::MeetingScheduled));
        assert!("Won".parse::<PipelineStage>().is_err());
    }

    #[test]
    fn test_lp_accepts_row_field_names() {
        let row = serde_json::json!({
            "id": "6f1c1b7e-5f5e-4c53-9a8e-3c8b0d6f2a11",
            "name": "Ada",
            "email": "ada@example.com",
            "organization": "Pension Fund",
            "investor_type": "Pension",
            "interests": ["Infrastructure"],
            "stage": "In Negotiation",
            "approval": "approved",
            "created_at": "2026-01-05T10:00:00Z"
        });

        let lp: LpRecord = serde_json::from_value(row).unwrap();
        assert_eq!(lp.investor_type.as_deref(), Some("Pension"));
        assert_eq!(lp.stage, PipelineStage::InNegotiation);
        assert_eq!(lp.approval, ApprovalStatus::Approved);

        let json = serde_json::to_value(&lp).unwrap();
        assert_eq!(json["investorType"], "Pension");
        assert_eq!(json["stage"], "In Negotiation");
    }
}
