//! Run Orchestrator
//!
//! Repeats a full sweep of every source over the catalog a fixed number of
//! times and folds each sweep into one deduplicated result set.
//!
//! ```text
//!  pass 1:  source A ──merge──▶ source B ──merge──▶ pause
//!  pass 2:  source A ──merge──▶ source B ──merge──▶ pause
//!  pass 3:  source A ──merge──▶ source B ──merge──▶ done
//! ```
//!
//! Sources are flaky and their paging is not stable between calls, so later
//! passes pick up papers earlier passes missed. An identity key committed
//! once is never committed again.

use std::collections::HashSet;
use std::time::Duration;
use tracing::info;

use crate::aggregator::{Aggregator, SourceHarvest};
use crate::catalog::Catalog;
use crate::models::{ResultTable, SeenSet};
use crate::search::PaperSource;

/// Accumulated output of a run: the committed rows and every identity key
/// they cover.
#[derive(Debug, Default)]
pub struct RunState {
    pub table: ResultTable,
    pub seen: SeenSet,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one source's harvest into the run.
    ///
    /// Rows whose key was committed by an earlier merge are discarded. A key
    /// first committed by this merge may still add rows for the other
    /// projects it matched in the same harvest. Returns the number of rows
    /// added.
    pub fn merge(&mut self, harvest: &SourceHarvest) -> usize {
        let mut committed_now: HashSet<&str> = HashSet::new();
        let mut added = 0;

        for (project, doc) in harvest.table.rows() {
            let key = doc.key();
            if self.seen.contains(key) && !committed_now.contains(key) {
                continue;
            }
            if self.table.push(project, doc.clone()) {
                added += 1;
            }
            committed_now.insert(key);
            self.seen.insert(key);
        }

        added
    }
}

pub struct RunOrchestrator {
    catalog: Catalog,
    sources: Vec<Box<dyn PaperSource>>,
    passes: usize,
    pass_pause: Duration,
}

impl RunOrchestrator {
    pub fn new(catalog: Catalog, sources: Vec<Box<dyn PaperSource>>) -> Self {
        Self {
            catalog,
            sources,
            passes: 3,
            pass_pause: Duration::from_secs(5),
        }
    }

    /// Set the number of full passes
    pub fn with_passes(mut self, passes: usize) -> Self {
        self.passes = passes;
        self
    }

    /// Set the pause between passes
    pub fn with_pass_pause(mut self, pause: Duration) -> Self {
        self.pass_pause = pause;
        self
    }

    /// Execute every pass and return the merged result.
    pub async fn run(&self) -> RunState {
        let mut state = RunState::new();
        let aggregator = Aggregator::new(&self.catalog);

        for pass in 1..=self.passes {
            info!(pass, total = self.passes, "Starting pass");

            for source in &self.sources {
                let harvest = aggregator.sweep(source.as_ref(), &state.seen).await;
                let added = state.merge(&harvest);
                info!(
                    pass,
                    source = source.name(),
                    requests = harvest.requests,
                    harvested = harvest.table.row_count(),
                    added,
                    "Source sweep merged"
                );
            }

            info!(
                pass,
                rows = state.table.row_count(),
                papers = state.seen.len(),
                "Pass complete"
            );

            if pass < self.passes && !self.pass_pause.is_zero() {
                tokio::time::sleep(self.pass_pause).await;
            }
        }

        state
    }
}
