// Service exports
pub mod board;
pub mod cache;
pub mod hosted;
pub mod memory;
pub mod notify;
pub mod postgres;
pub mod store;

pub use board::{BoardError, MoveOutcome, PipelineBoard};
pub use cache::{CacheKey, MatchCache};
pub use hosted::{HostedClient, HostedTables, Query};
pub use memory::MemoryStore;
pub use notify::{notify_best_effort, Notification, Notifier, NotifyError};
pub use postgres::PostgresClient;
pub use store::{RecordStore, StoreError};
