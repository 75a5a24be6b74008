//! Per-phrase pagination.
//!
//! [`PhrasePages`] walks one phrase through a [`PaperSource`] one page at a
//! time, applying the source's [`PagingPolicy`]:
//!
//! ```text
//!   Fetching ──empty──▶ RetryingEmpty(1) ──empty──▶ ... ──▶ Exhausted
//!      ▲                     │
//!      └──────documents──────┘
//! ```
//!
//! Bounded-offset sources go straight to `Exhausted` on an empty page, a
//! failed request or reaching their offset cap.
//!
//! Request pacing is kept in a [`Throttle`] that outlives a single phrase, so
//! the delay also separates the last request of one phrase from the first
//! request of the next.

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{PaperSource, PagingPolicy, RawDocument, SearchError};

/// Minimum spacing between consecutive requests to one source.
#[derive(Debug, Default)]
pub struct Throttle {
    last_request: Option<Instant>,
}

impl Throttle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep until `delay` has passed since the previous request finished.
    /// Returns immediately before the first request.
    pub async fn wait(&self, delay: Duration) {
        let Some(last) = self.last_request else {
            return;
        };
        let elapsed = last.elapsed();
        if elapsed < delay {
            tokio::time::sleep(delay - elapsed).await;
        }
    }

    /// Record that a request just finished.
    pub fn mark(&mut self) {
        self.last_request = Some(Instant::now());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhraseState {
    Fetching,
    /// Number of consecutive empty pages seen so far.
    RetryingEmpty(u32),
    Exhausted,
}

/// Lazy, finite sequence of result pages for one phrase on one source.
pub struct PhrasePages<'a> {
    source: &'a dyn PaperSource,
    phrase: &'a str,
    throttle: &'a mut Throttle,
    offset: usize,
    state: PhraseState,
    requests: usize,
}

impl<'a> PhrasePages<'a> {
    pub fn new(source: &'a dyn PaperSource, phrase: &'a str, throttle: &'a mut Throttle) -> Self {
        Self {
            source,
            phrase,
            throttle,
            offset: 0,
            state: PhraseState::Fetching,
            requests: 0,
        }
    }

    /// Number of requests issued so far.
    pub fn requests(&self) -> usize {
        self.requests
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == PhraseState::Exhausted
    }

    /// Fetch the next non-empty page, or `None` once the phrase is exhausted.
    pub async fn next_page(&mut self) -> Option<Vec<RawDocument>> {
        loop {
            if self.state == PhraseState::Exhausted {
                return None;
            }

            let limit = match self.source.policy() {
                PagingPolicy::BoundedOffset { page_size, max_offset, .. } => {
                    if self.offset >= *max_offset {
                        debug!(
                            source = self.source.name(),
                            phrase = self.phrase,
                            offset = self.offset,
                            "Offset cap reached"
                        );
                        self.state = PhraseState::Exhausted;
                        return None;
                    }
                    (*page_size).min(max_offset - self.offset)
                }
                PagingPolicy::PageCursor { page_size, .. } => *page_size,
            };

            self.pause_before_request().await;
            self.requests += 1;
            let result = self.source.fetch_page(self.phrase, self.offset, limit).await;
            self.throttle.mark();

            match result {
                Ok(docs) if !docs.is_empty() => {
                    debug!(
                        source = self.source.name(),
                        phrase = self.phrase,
                        offset = self.offset,
                        count = docs.len(),
                        "Fetched page"
                    );
                    self.offset += self.source.policy().page_size();
                    self.state = PhraseState::Fetching;
                    return Some(docs);
                }
                Ok(_) => self.on_empty_page(None),
                Err(e) => self.on_empty_page(Some(e)),
            }
        }
    }

    fn on_empty_page(&mut self, error: Option<SearchError>) {
        match self.source.policy() {
            PagingPolicy::PageCursor { empty_page_attempts, .. } => {
                if let Some(e) = &error {
                    warn!(
                        source = self.source.name(),
                        phrase = self.phrase,
                        offset = self.offset,
                        error = %e,
                        "Page request failed, treating as empty page"
                    );
                }
                let seen = match self.state {
                    PhraseState::RetryingEmpty(n) => n + 1,
                    _ => 1,
                };
                self.state = if seen >= *empty_page_attempts {
                    PhraseState::Exhausted
                } else {
                    PhraseState::RetryingEmpty(seen)
                };
            }
            PagingPolicy::BoundedOffset { .. } => {
                match &error {
                    Some(SearchError::Status { status, .. }) => info!(
                        source = self.source.name(),
                        phrase = self.phrase,
                        status,
                        "Non-success status, stopping phrase"
                    ),
                    Some(e) => warn!(
                        source = self.source.name(),
                        phrase = self.phrase,
                        error = %e,
                        "Request failed, stopping phrase"
                    ),
                    None => {}
                }
                self.state = PhraseState::Exhausted;
            }
        }
    }

    async fn pause_before_request(&self) {
        let delay = match (self.state, self.source.policy()) {
            (PhraseState::RetryingEmpty(_), PagingPolicy::PageCursor { retry_pause, .. }) => {
                *retry_pause
            }
            (_, policy) => policy.page_delay(),
        };
        self.throttle.wait(delay).await;
    }
}
