//! Optimistic mutation of keyed in-memory state.
//!
//! The caller's view changes before the remote write is acknowledged. If the
//! write fails, only the change that was made is undone; other fields the
//! entry picked up while the write was in flight are kept.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum OptimisticError<V, R, E> {
    #[error("no entry to update")]
    Missing,

    #[error("change refused: {0}")]
    Refused(R),

    #[error("commit failed, local state restored: {error}")]
    CommitFailed { error: E, restored: V },
}

/// Result of a successful `apply_optimistic` call
#[derive(Debug, Clone, PartialEq)]
pub enum Applied<V> {
    /// The change was made and committed
    Committed(V),
    /// Nothing to change; commit was skipped
    Unchanged(V),
}

/// Validate and mutate under the lock, commit, undo on failure
///
/// `mutate` sees the current entry while the write lock is held. It returns
/// `Err` to refuse the change, `Ok(None)` when there is nothing to do, or
/// `Ok(Some(prior))` after changing the entry. Neither of the first two
/// reaches `commit`.
///
/// The lock is released before `commit` runs, so other readers see the
/// tentative value while the write is in flight. On failure `undo` is handed
/// `prior` and the entry as it is at that point.
pub async fn apply_optimistic<K, V, P, R, E, M, U, C, Fut>(
    state: &RwLock<HashMap<K, V>>,
    key: &K,
    mutate: M,
    undo: U,
    commit: C,
) -> Result<Applied<V>, OptimisticError<V, R, E>>
where
    K: Eq + Hash,
    V: Clone,
    M: FnOnce(&mut V) -> Result<Option<P>, R>,
    U: FnOnce(&mut V, P),
    C: FnOnce(V) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let (prior, tentative) = {
        let mut guard = state.write().await;
        let Some(entry) = guard.get_mut(key) else {
            return Err(OptimisticError::Missing);
        };
        match mutate(entry).map_err(OptimisticError::Refused)? {
            Some(prior) => (prior, entry.clone()),
            None => return Ok(Applied::Unchanged(entry.clone())),
        }
    };

    match commit(tentative.clone()).await {
        Ok(()) => Ok(Applied::Committed(tentative)),
        Err(error) => {
            let mut guard = state.write().await;
            let restored = match guard.get_mut(key) {
                Some(entry) => {
                    undo(entry, prior);
                    entry.clone()
                }
                // Removed while the write was in flight; stays removed
                None => {
                    let mut value = tentative;
                    undo(&mut value, prior);
                    value
                }
            };
            Err(OptimisticError::CommitFailed { error, restored })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Card {
        column: u8,
        note: &'static str,
    }

    fn board() -> RwLock<HashMap<u32, Card>> {
        RwLock::new(HashMap::from([(1u32, Card { column: 0, note: "draft" })]))
    }

    fn set_column(to: u8) -> impl FnOnce(&mut Card) -> Result<Option<u8>, &'static str> {
        move |card| {
            let prior = card.column;
            card.column = to;
            Ok(Some(prior))
        }
    }

    fn restore_column(card: &mut Card, prior: u8) {
        card.column = prior;
    }

    #[tokio::test]
    async fn test_commit_success_keeps_mutation() {
        let state = board();

        let result = apply_optimistic(&state, &1, set_column(3), restore_column, |_| async {
            Ok::<(), String>(())
        })
        .await
        .unwrap();

        assert_eq!(result, Applied::Committed(Card { column: 3, note: "draft" }));
        assert_eq!(state.read().await.get(&1).unwrap().column, 3);
    }

    #[tokio::test]
    async fn test_commit_failure_restores_prior_value() {
        let state = board();

        let err = apply_optimistic(&state, &1, set_column(3), restore_column, |_| async {
            Err::<(), String>("offline".to_string())
        })
        .await
        .unwrap_err();

        match err {
            OptimisticError::CommitFailed { error, restored } => {
                assert_eq!(error, "offline");
                assert_eq!(restored, Card { column: 0, note: "draft" });
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(state.read().await.get(&1).unwrap().column, 0);
    }

    #[tokio::test]
    async fn test_failed_commit_keeps_concurrent_edit_to_other_field() {
        let state = board();
        let shared = &state;

        let err = apply_optimistic(&state, &1, set_column(3), restore_column, |_| async move {
            // Another writer touches a different field while this write is in flight
            shared.write().await.get_mut(&1).unwrap().note = "approved";
            Err::<(), String>("offline".to_string())
        })
        .await
        .unwrap_err();

        match err {
            OptimisticError::CommitFailed { restored, .. } => {
                assert_eq!(restored, Card { column: 0, note: "approved" });
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(state.read().await.get(&1).unwrap(), &Card { column: 0, note: "approved" });
    }

    #[tokio::test]
    async fn test_refused_change_skips_commit() {
        let state = board();
        let mut committed = false;

        let err = apply_optimistic(
            &state,
            &1,
            |card: &mut Card| -> Result<Option<u8>, &'static str> {
                if card.note == "draft" {
                    return Err("drafts are locked");
                }
                card.column = 5;
                Ok(Some(0))
            },
            restore_column,
            |_| {
                committed = true;
                async { Ok::<(), String>(()) }
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, OptimisticError::Refused("drafts are locked")));
        assert!(!committed);
        assert_eq!(state.read().await.get(&1).unwrap().column, 0);
    }

    #[tokio::test]
    async fn test_no_change_skips_commit() {
        let state = board();
        let mut committed = false;

        let result = apply_optimistic(
            &state,
            &1,
            |_: &mut Card| Ok::<Option<u8>, &'static str>(None),
            restore_column,
            |_| {
                committed = true;
                async { Ok::<(), String>(()) }
            },
        )
        .await
        .unwrap();

        assert_eq!(result, Applied::Unchanged(Card { column: 0, note: "draft" }));
        assert!(!committed);
    }

    #[tokio::test]
    async fn test_missing_key_skips_commit() {
        let state: RwLock<HashMap<u32, Card>> = RwLock::new(HashMap::new());
        let mut committed = false;

        let err = apply_optimistic(&state, &7, set_column(1), restore_column, |_| {
            committed = true;
            async { Ok::<(), String>(()) }
        })
        .await
        .unwrap_err();

        assert!(matches!(err, OptimisticError::Missing));
        assert!(!committed);
    }
}
