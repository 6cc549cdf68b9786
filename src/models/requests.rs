use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{ApprovalStatus, NewGp, NewLp, PipelineStage};

/// GP registration form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GpRegistrationRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, max = 200, message = "Firm is required"))]
    pub firm: String,
    #[validate(length(min = 1, max = 50, message = "Select an AUM bracket"))]
    #[serde(alias = "aum_bracket", rename = "aumBracket")]
    pub aum_bracket: String,
    #[validate(length(min = 1, message = "Select at least one strategy"))]
    #[serde(default)]
    pub strategies: Vec<String>,
    #[validate(length(max = 200))]
    #[serde(alias = "fund_in_market", rename = "fundInMarket", default)]
    pub fund_in_market: Option<String>,
}

impl GpRegistrationRequest {
    pub fn into_new_gp(self) -> NewGp {
        NewGp {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            firm: self.firm.trim().to_string(),
            aum_bracket: self.aum_bracket.trim().to_string(),
            strategies: clean_labels(self.strategies),
            fund_in_market: clean_optional(self.fund_in_market),
        }
    }
}

/// LP registration form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LpRegistrationRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, max = 200, message = "Organization is required"))]
    pub organization: String,
    #[validate(length(max = 100))]
    #[serde(alias = "investor_type", rename = "investorType", default)]
    pub investor_type: Option<String>,
    #[validate(length(min = 1, message = "Select at least one area of interest"))]
    #[serde(default)]
    pub interests: Vec<String>,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub jurisdiction: Option<String>,
}

impl LpRegistrationRequest {
    pub fn into_new_lp(self) -> NewLp {
        NewLp {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            organization: self.organization.trim().to_string(),
            investor_type: clean_optional(self.investor_type),
            interests: clean_labels(self.interests),
            jurisdiction: clean_optional(self.jurisdiction),
        }
    }
}

/// Contact form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub company: Option<String>,
    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
}

/// Details a visitor leaves to unlock a gated document
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DocumentAccessRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub company: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Document is required"))]
    pub document: String,
}

/// Kanban drop onto a column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveStageRequest {
    pub stage: PipelineStage,
}

/// Admin approval decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub approval: ApprovalStatus,
}

/// New entry in an investor thread
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PostMessageRequest {
    #[validate(length(min = 1, max = 5000, message = "Message cannot be empty"))]
    pub body: String,
}

/// Filters for the admin match list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchQuery {
    #[serde(alias = "min_score", rename = "minScore", default)]
    pub min_score: Option<u32>,
    #[serde(default)]
    pub limit: Option<usize>,
}

fn clean_labels(labels: Vec<String>) -> Vec<String> {
    labels
        .into_iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gp_request_validation() {
        let req = GpRegistrationRequest {
            name: "Jane".to_string(),
            email: "not-an-email".to_string(),
            firm: "".to_string(),
            aum_bracket: "€500M+".to_string(),
            strategies: vec![],
            fund_in_market: None,
        };

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("firm"));
        assert!(fields.contains_key("strategies"));
        assert!(!fields.contains_key("name"));
    }

    #[test]
    fn test_lp_request_drops_blank_labels() {
        let req = LpRegistrationRequest {
            name: " Ada ".to_string(),
            email: "Ada@Example.com".to_string(),
            organization: "Northwind Pension".to_string(),
            investor_type: Some("  ".to_string()),
            interests: vec!["AI".to_string(), " ".to_string(), " Healthcare ".to_string()],
            jurisdiction: Some("UK".to_string()),
        };

        let lp = req.into_new_lp();
        assert_eq!(lp.name, "Ada");
        assert_eq!(lp.email, "ada@example.com");
        assert_eq!(lp.investor_type, None);
        assert_eq!(lp.interests, vec!["AI", "Healthcare"]);
    }
}
