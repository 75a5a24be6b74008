//! arXiv Client
//!
//! Exact-phrase search against the arXiv Atom API. Each alias is wrapped in
//! quotes (`all:"<phrase>"`) and paged with `start`/`max_results`.
//!
//! Records are classified against the searched project only.

use async_trait::async_trait;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::time::Duration;
use tracing::debug;

use super::{MatchScope, PaperSource, PagingPolicy, RawDocument, SearchError};
use crate::config::ArxivConfig;

const SOURCE_NAME: &str = "arXiv";

/// HTTP client for the arXiv API.
pub struct ArxivClient {
    client: reqwest::Client,
    base_url: String,
    policy: PagingPolicy,
}

impl ArxivClient {
    pub fn new(
        base_url: impl Into<String>,
        policy: PagingPolicy,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            policy,
        })
    }

    /// Configure client from config
    pub fn from_config(
        config: &ArxivConfig,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let policy = PagingPolicy::PageCursor {
            page_size: config.page_size,
            page_delay: config.page_delay,
            empty_page_attempts: config.empty_page_attempts,
            retry_pause: config.retry_pause,
        };
        Self::new(config.api_url.clone(), policy, user_agent, timeout)
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn policy(&self) -> &PagingPolicy {
        &self.policy
    }

    fn match_scope(&self) -> MatchScope {
        MatchScope::SearchedProject
    }

    async fn fetch_page(
        &self,
        phrase: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<RawDocument>, SearchError> {
        let url = build_search_url(&self.base_url, phrase, offset, limit);
        debug!(url = %url, "arXiv request");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                source_name: SOURCE_NAME.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_feed(&body).map_err(|e| SearchError::Parse {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        })
    }
}

/// Build the query URL for one page of an exact-phrase search.
pub fn build_search_url(base_url: &str, phrase: &str, start: usize, max_results: usize) -> String {
    let query = format!("all:\"{}\"", phrase);
    format!(
        "{}?search_query={}&start={}&max_results={}",
        base_url,
        urlencoding::encode(&query),
        start,
        max_results
    )
}

// ── Atom parsing ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryField {
    Id,
    Title,
    Summary,
    Comment,
}

impl EntryField {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"id" => Some(Self::Id),
            b"title" => Some(Self::Title),
            b"summary" => Some(Self::Summary),
            // arxiv:comment
            b"comment" => Some(Self::Comment),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct EntryBuilder {
    id: String,
    title: String,
    summary: String,
    comment: Option<String>,
    alternate: Option<String>,
}

impl EntryBuilder {
    fn push_text(&mut self, field: EntryField, text: &str) {
        match field {
            EntryField::Id => self.id.push_str(text),
            EntryField::Title => self.title.push_str(text),
            EntryField::Summary => self.summary.push_str(text),
            EntryField::Comment => self.comment.get_or_insert_with(String::new).push_str(text),
        }
    }

    /// Entries without an identity link and API error entries yield `None`.
    fn build(self) -> Option<RawDocument> {
        let EntryBuilder {
            id,
            title,
            summary,
            comment,
            alternate,
        } = self;

        let id = id.trim();
        if id.contains("/api/errors") {
            return None;
        }

        let url = alternate.unwrap_or_else(|| id.to_string());
        if url.is_empty() {
            return None;
        }

        Some(RawDocument {
            title: normalize_whitespace(&title),
            url,
            summary: summary.trim().to_string(),
            comment: comment.map(|c| normalize_whitespace(&c)),
        })
    }
}

/// Parse every `<entry>` in an arXiv Atom feed.
pub fn parse_feed(xml: &str) -> Result<Vec<RawDocument>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut docs = Vec::new();
    let mut entry: Option<EntryBuilder> = None;
    let mut field: Option<EntryField> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name();
                if name.as_ref() == b"entry" {
                    entry = Some(EntryBuilder::default());
                } else if let Some(current) = entry.as_mut() {
                    if name.as_ref() == b"link" {
                        record_link(current, &e)?;
                    } else {
                        field = EntryField::from_local_name(name.as_ref());
                    }
                }
            }
            Event::Empty(e) => {
                if let Some(current) = entry.as_mut() {
                    if e.local_name().as_ref() == b"link" {
                        record_link(current, &e)?;
                    }
                }
            }
            Event::Text(t) => {
                if let (Some(current), Some(f)) = (entry.as_mut(), field) {
                    current.push_text(f, &t.unescape()?);
                }
            }
            Event::CData(c) => {
                if let (Some(current), Some(f)) = (entry.as_mut(), field) {
                    current.push_text(f, &String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(e) => {
                field = None;
                if e.local_name().as_ref() == b"entry" {
                    if let Some(doc) = entry.take().and_then(EntryBuilder::build) {
                        docs.push(doc);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(docs)
}

/// Keep the first alternate link. A link without `rel` is an alternate link.
fn record_link(entry: &mut EntryBuilder, link: &BytesStart<'_>) -> Result<(), quick_xml::Error> {
    if entry.alternate.is_some() {
        return Ok(());
    }

    let mut rel = None;
    let mut href = None;
    for attr in link.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"rel" => rel = Some(attr.unescape_value()?.into_owned()),
            b"href" => href = Some(attr.unescape_value()?.into_owned()),
            _ => {}
        }
    }

    if matches!(rel.as_deref(), None | Some("alternate")) {
        entry.alternate = href;
    }
    Ok(())
}

/// Collapse runs of whitespace into single spaces.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
