// Core algorithm exports
pub mod export;
pub mod labels;
pub mod matcher;
pub mod optimistic;
pub mod pipeline;
pub mod scoring;
pub mod taxonomy;

pub use export::{export_csv, export_filename, CsvRow, ExportEntity, ExportError};
pub use labels::overlapping_interests;
pub use matcher::{MatchResult, Matcher};
pub use optimistic::{apply_optimistic, Applied, OptimisticError};
pub use pipeline::{group_by_stage, plan_move, PipelineError, StageChange};
pub use scoring::{calculate_match_score, quality_band, MatchScore};
pub use taxonomy::{StrategyTag, TAXONOMY_VERSION};
