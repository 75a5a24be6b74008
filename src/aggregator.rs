//! Aggregator
//!
//! Sweeps one [`PaperSource`] across every alias in the catalog. Each alias is
//! its own search phrase; matches from all of a project's phrases land in the
//! same bucket.
//!
//! The aggregator never mutates the run-wide [`SeenSet`]. It reads it to skip
//! identities committed earlier and returns its own additions in a
//! [`SourceHarvest`] for the orchestrator to merge.

use std::collections::HashSet;
use std::slice;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::classifier::classify;
use crate::models::{ResultTable, SeenSet};
use crate::search::{MatchScope, PaperSource, PhrasePages, Throttle};

/// Everything one source produced during one sweep.
#[derive(Debug, Default)]
pub struct SourceHarvest {
    pub table: ResultTable,
    /// Identity keys this sweep recorded a match for.
    pub emitted: HashSet<String>,
    /// Total pages requested across all phrases.
    pub requests: usize,
}

pub struct Aggregator<'a> {
    catalog: &'a Catalog,
}

impl<'a> Aggregator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Run every (project, alias) phrase through `source`.
    ///
    /// A record is classified only the first time its key shows up, both
    /// within a phrase and across the sweep, and never if `seen` already
    /// holds it. Keys are recorded once they produce at least one match.
    ///
    /// Requests are paced by the source's page delay across the whole sweep,
    /// including between the last page of one phrase and the next phrase.
    pub async fn sweep(&self, source: &dyn PaperSource, seen: &SeenSet) -> SourceHarvest {
        let mut harvest = SourceHarvest::default();
        let mut throttle = Throttle::new();

        for project in self.catalog.projects() {
            let scope = match source.match_scope() {
                MatchScope::SearchedProject => slice::from_ref(project),
                MatchScope::FullCatalog => self.catalog.projects(),
            };

            for alias in project.aliases() {
                info!(source = source.name(), phrase = %alias, "Searching");

                let mut phrase_emitted: HashSet<String> = HashSet::new();
                let mut matched_here = 0usize;
                let mut pages = PhrasePages::new(source, alias, &mut throttle);

                while let Some(page) = pages.next_page().await {
                    for raw in page {
                        if !phrase_emitted.insert(raw.url.clone()) {
                            continue;
                        }
                        if seen.contains(&raw.url) || harvest.emitted.contains(&raw.url) {
                            continue;
                        }

                        let matched = classify(&raw.match_text(), scope);
                        if matched.is_empty() {
                            continue;
                        }

                        debug!(url = %raw.url, projects = ?matched, "Matched");
                        let doc = raw.into_document();
                        for name in &matched {
                            harvest.table.push(name, doc.clone());
                        }
                        harvest.emitted.insert(doc.url);
                        matched_here += 1;
                    }
                }

                harvest.requests += pages.requests();
                info!(
                    source = source.name(),
                    phrase = %alias,
                    seen = phrase_emitted.len(),
                    matched = matched_here,
                    "Phrase complete"
                );
            }
        }

        harvest
    }
}
