// Citation Scout - finds papers that reference a catalog of open-source projects

pub mod config;
pub mod models;
pub mod types;
pub mod catalog;
pub mod classifier;
pub mod search;        // Paper sources (arXiv, Semantic Scholar) and paging
pub mod aggregator;
pub mod orchestrator;  // Multi-pass sweep and merge
pub mod report;
pub mod utils;

// Re-exports for convenience
pub use catalog::{Catalog, Project};
pub use config::Config;
pub use models::{Document, ResultTable, SeenSet};
pub use orchestrator::{RunOrchestrator, RunState};
pub use types::{AppError, AppResult};
