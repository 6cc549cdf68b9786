use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::optimistic::{apply_optimistic, Applied, OptimisticError};
use crate::core::pipeline::{group_by_stage, plan_move, PipelineError, StageChange};
use crate::models::{ApprovalStatus, LpRecord, PipelineStage};
use crate::services::store::{RecordStore, StoreError};

#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Failed to load investors: {0}")]
    Load(#[from] StoreError),

    /// The store refused the write; the board already shows `restored` again
    #[error("Change was not saved and has been reverted: {error}")]
    RolledBack { error: StoreError, restored: Box<LpRecord> },
}

/// Outcome of a Kanban drop
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    Moved(LpRecord),
    Unchanged(LpRecord),
}

impl MoveOutcome {
    pub fn investor(&self) -> &LpRecord {
        match self {
            MoveOutcome::Moved(lp) | MoveOutcome::Unchanged(lp) => lp,
        }
    }
}

/// In-memory mirror of LP rows backing the pipeline view
///
/// Stage and approval changes land here first and are then written to the
/// store. A failed write undoes only the field it was changing.
#[derive(Default)]
pub struct PipelineBoard {
    investors: RwLock<HashMap<Uuid, LpRecord>>,
}

impl PipelineBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the board with the store's current rows
    pub async fn refresh(&self, store: &dyn RecordStore) -> Result<usize, StoreError> {
        let lps = store.list_lps().await?;
        let count = lps.len();

        let mut investors = self.investors.write().await;
        *investors = lps.into_iter().map(|lp| (lp.id, lp)).collect();

        tracing::debug!("Pipeline board refreshed with {} investors", count);
        Ok(count)
    }

    pub async fn upsert(&self, lp: LpRecord) {
        self.investors.write().await.insert(lp.id, lp);
    }

    pub async fn remove(&self, id: Uuid) {
        self.investors.write().await.remove(&id);
    }

    pub async fn get(&self, id: Uuid) -> Option<LpRecord> {
        self.investors.read().await.get(&id).cloned()
    }

    /// All seven columns in stage order
    pub async fn columns(&self) -> Vec<(PipelineStage, Vec<LpRecord>)> {
        let investors: Vec<LpRecord> = self.investors.read().await.values().cloned().collect();
        group_by_stage(investors)
    }

    /// Look up an investor, reloading the board once if it is not there yet
    async fn find(&self, store: &dyn RecordStore, id: Uuid) -> Result<LpRecord, BoardError> {
        if let Some(lp) = self.get(id).await {
            return Ok(lp);
        }

        self.refresh(store).await?;
        self.get(id)
            .await
            .ok_or_else(|| BoardError::Pipeline(PipelineError::NotFound(id)))
    }

    /// Move an investor to another stage
    ///
    /// The rejected-investor rule is checked against the board entry under
    /// its write lock. Rejected investors and same-stage drops never reach
    /// the store, and a failed write puts back only the stage.
    pub async fn move_stage(
        &self,
        store: &dyn RecordStore,
        id: Uuid,
        to: PipelineStage,
    ) -> Result<MoveOutcome, BoardError> {
        self.find(store, id).await?;

        let result = apply_optimistic(
            &self.investors,
            &id,
            |lp: &mut LpRecord| -> Result<Option<StageChange>, PipelineError> {
                let change = plan_move(lp, to)?;
                if let Some(change) = change {
                    lp.stage = change.to;
                }
                Ok(change)
            },
            |lp: &mut LpRecord, change: StageChange| lp.stage = change.from,
            |_| store.update_lp_stage(id, to),
        )
        .await;

        match result {
            Ok(Applied::Committed(lp)) => {
                tracing::info!("Moved investor {} to {}", id, lp.stage);
                Ok(MoveOutcome::Moved(lp))
            }
            Ok(Applied::Unchanged(lp)) => Ok(MoveOutcome::Unchanged(lp)),
            Err(OptimisticError::Refused(e)) => {
                tracing::warn!("Blocked stage move for {}: {}", id, e);
                Err(e.into())
            }
            Err(e) => Err(Self::rollback_error(id, e)),
        }
    }

    /// Change an investor's approval
    ///
    /// A failed write puts back only the approval.
    pub async fn set_approval(
        &self,
        store: &dyn RecordStore,
        id: Uuid,
        approval: ApprovalStatus,
    ) -> Result<LpRecord, BoardError> {
        self.find(store, id).await?;

        let result = apply_optimistic(
            &self.investors,
            &id,
            |lp| {
                if lp.approval == approval {
                    return Ok::<_, PipelineError>(None);
                }
                Ok(Some(std::mem::replace(&mut lp.approval, approval)))
            },
            |lp, previous| lp.approval = previous,
            |_| store.update_lp_approval(id, approval),
        )
        .await;

        match result {
            Ok(Applied::Committed(lp)) => {
                tracing::info!("Set approval of investor {} to {}", id, approval);
                Ok(lp)
            }
            Ok(Applied::Unchanged(lp)) => Ok(lp),
            Err(e) => Err(Self::rollback_error(id, e)),
        }
    }

    fn rollback_error(id: Uuid, error: OptimisticError<LpRecord, PipelineError, StoreError>) -> BoardError {
        match error {
            OptimisticError::Missing => BoardError::Pipeline(PipelineError::NotFound(id)),
            OptimisticError::Refused(e) => BoardError::Pipeline(e),
            OptimisticError::CommitFailed { error, restored } => {
                tracing::error!("Reverted investor {} after failed write: {}", id, error);
                BoardError::RolledBack {
                    error,
                    restored: Box::new(restored),
                }
            }
        }
    }
}
