//! Search Module
//!
//! Paper sources queried once per alias phrase:
//! - arXiv (page-cursor) - exact-phrase search over the Atom API
//! - Semantic Scholar (bounded-offset) - keyword search over the Graph API
//!
//! Both sit behind [`PaperSource`]; paging, retry and stop rules live in
//! [`paginator`] and are selected by each source's [`PagingPolicy`].

pub mod arxiv;
pub mod paginator;
pub mod semantic_scholar;

pub use arxiv::ArxivClient;
pub use paginator::{PhrasePages, Throttle};
pub use semantic_scholar::SemanticScholarClient;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::models::Document;

/// Errors that can occur while fetching one page from a source
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{source_name} returned status {status}")]
    Status { source_name: String, status: u16 },

    #[error("Failed to parse {source_name} response: {message}")]
    Parse { source_name: String, message: String },
}

/// A record exactly as a source returned it, before classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDocument {
    pub title: String,
    /// Identity key
    pub url: String,
    pub summary: String,
    /// Free-text comment field, only provided by some sources
    pub comment: Option<String>,
}

impl RawDocument {
    /// Text the classifier sees: title, summary and comment joined by spaces.
    pub fn match_text(&self) -> String {
        let comment = self.comment.as_deref().unwrap_or("");
        format!("{} {} {}", self.title, self.summary, comment)
    }

    pub fn into_document(self) -> Document {
        Document::new(self.title, self.url, &self.summary)
    }
}

/// Which projects a newly seen record is classified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchScope {
    /// Only the project whose alias produced the phrase.
    SearchedProject,
    /// Every project in the catalog.
    FullCatalog,
}

/// How a source pages through results for one phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagingPolicy {
    /// Advance a start cursor by `page_size` until an empty page. An empty or
    /// failed page is retried until `empty_page_attempts` consecutive empty
    /// pages have been seen.
    PageCursor {
        page_size: usize,
        page_delay: Duration,
        empty_page_attempts: u32,
        retry_pause: Duration,
    },
    /// Advance an offset by `page_size`, never requesting at or past
    /// `max_offset`. Any failure ends the phrase without retry.
    BoundedOffset {
        page_size: usize,
        max_offset: usize,
        page_delay: Duration,
    },
}

impl PagingPolicy {
    pub fn page_size(&self) -> usize {
        match self {
            PagingPolicy::PageCursor { page_size, .. } => *page_size,
            PagingPolicy::BoundedOffset { page_size, .. } => *page_size,
        }
    }

    pub fn page_delay(&self) -> Duration {
        match self {
            PagingPolicy::PageCursor { page_delay, .. } => *page_delay,
            PagingPolicy::BoundedOffset { page_delay, .. } => *page_delay,
        }
    }
}

/// A bibliographic source that can be searched page by page.
#[async_trait]
pub trait PaperSource: Send + Sync {
    fn name(&self) -> &str;

    fn policy(&self) -> &PagingPolicy;

    fn match_scope(&self) -> MatchScope;

    /// Fetch up to `limit` records for `phrase` starting at `offset`.
    async fn fetch_page(
        &self,
        phrase: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<RawDocument>, SearchError>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted in-memory source shared by paginator, aggregator and
    //! orchestrator tests.

    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Instant;

    pub type ScriptedPage = Result<Vec<RawDocument>, u16>;

    pub struct ScriptedSource {
        name: String,
        policy: PagingPolicy,
        scope: MatchScope,
        scripts: Mutex<HashMap<String, VecDeque<ScriptedPage>>>,
        requests: Mutex<Vec<(String, usize, usize)>>,
        request_times: Mutex<Vec<Instant>>,
    }

    impl ScriptedSource {
        pub fn new(name: &str, policy: PagingPolicy, scope: MatchScope) -> Self {
            Self {
                name: name.to_string(),
                policy,
                scope,
                scripts: Mutex::new(HashMap::new()),
                requests: Mutex::new(Vec::new()),
                request_times: Mutex::new(Vec::new()),
            }
        }

        /// Queue the pages returned for `phrase`, in request order. Once the
        /// script runs out every further request yields an empty page.
        pub fn script(self, phrase: &str, pages: Vec<ScriptedPage>) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(phrase.to_string(), pages.into());
            self
        }

        pub fn requests(&self) -> Vec<(String, usize, usize)> {
            self.requests.lock().unwrap().clone()
        }

        /// Time between the starts of consecutive requests.
        pub fn request_gaps(&self) -> Vec<Duration> {
            let times = self.request_times.lock().unwrap();
            times.windows(2).map(|w| w[1] - w[0]).collect()
        }
    }

    #[async_trait]
    impl PaperSource for ScriptedSource {
        fn name(&self) -> &str {
            &self.name
        }

        fn policy(&self) -> &PagingPolicy {
            &self.policy
        }

        fn match_scope(&self) -> MatchScope {
            self.scope
        }

        async fn fetch_page(
            &self,
            phrase: &str,
            offset: usize,
            limit: usize,
        ) -> Result<Vec<RawDocument>, SearchError> {
            self.request_times.lock().unwrap().push(Instant::now());
            self.requests
                .lock()
                .unwrap()
                .push((phrase.to_string(), offset, limit));
            let next = self
                .scripts
                .lock()
                .unwrap()
                .get_mut(phrase)
                .and_then(|pages| pages.pop_front());
            match next {
                Some(Ok(docs)) => Ok(docs),
                Some(Err(status)) => Err(SearchError::Status {
                    source_name: self.name.clone(),
                    status,
                }),
                None => Ok(Vec::new()),
            }
        }
    }

    pub fn doc(url: &str, title: &str, summary: &str) -> RawDocument {
        RawDocument {
            title: title.to_string(),
            url: url.to_string(),
            summary: summary.to_string(),
            comment: None,
        }
    }

    pub fn cursor_policy(page_size: usize) -> PagingPolicy {
        PagingPolicy::PageCursor {
            page_size,
            page_delay: Duration::ZERO,
            empty_page_attempts: 2,
            retry_pause: Duration::ZERO,
        }
    }

    pub fn bounded_policy(page_size: usize, max_offset: usize) -> PagingPolicy {
        PagingPolicy::BoundedOffset {
            page_size,
            max_offset,
            page_delay: Duration::ZERO,
        }
    }
}
