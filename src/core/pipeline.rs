use thiserror::Error;
use uuid::Uuid;

use crate::models::{ApprovalStatus, LpRecord, PipelineStage};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Investor {0} was rejected and cannot be moved")]
    Rejected(Uuid),

    #[error("Investor not found: {0}")]
    NotFound(Uuid),
}

/// A stage change that passed the board rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageChange {
    pub investor_id: Uuid,
    pub from: PipelineStage,
    pub to: PipelineStage,
}

/// Decide whether a drop onto `to` changes anything
///
/// Returns `Ok(None)` when the investor already sits in `to`, and
/// `PipelineError::Rejected` for investors whose approval is rejected.
/// Neither case should reach the store.
pub fn plan_move(investor: &LpRecord, to: PipelineStage) -> Result<Option<StageChange>, PipelineError> {
    if investor.approval == ApprovalStatus::Rejected {
        return Err(PipelineError::Rejected(investor.id));
    }

    if investor.stage == to {
        return Ok(None);
    }

    Ok(Some(StageChange {
        investor_id: investor.id,
        from: investor.stage,
        to,
    }))
}

/// Group investors into one column per stage, in stage order
///
/// Columns are always all seven stages, empty ones included. Within a
/// column investors are newest first, then by name.
pub fn group_by_stage(investors: impl IntoIterator<Item = LpRecord>) -> Vec<(PipelineStage, Vec<LpRecord>)> {
    let mut columns: Vec<(PipelineStage, Vec<LpRecord>)> =
        PipelineStage::ALL.iter().map(|stage| (*stage, Vec::new())).collect();

    for investor in investors {
        // ALL covers every variant, so the position always exists
        if let Some(index) = PipelineStage::ALL.iter().position(|s| *s == investor.stage) {
            columns[index].1.push(investor);
        }
    }

    for (_, column) in columns.iter_mut() {
        column.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.name.cmp(&b.name)));
    }

    columns
}
