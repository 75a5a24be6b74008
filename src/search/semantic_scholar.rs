//! Semantic Scholar Client
//!
//! Keyword search against the Graph API `paper/search` endpoint. The API only
//! serves the first 1000 results of a query, so paging is capped by offset.
//!
//! Records are classified against the whole catalog.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{MatchScope, PaperSource, PagingPolicy, RawDocument, SearchError};
use crate::config::SemanticScholarConfig;

const SOURCE_NAME: &str = "Semantic Scholar";
const SEARCH_FIELDS: &str = "title,url,abstract";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<PaperRecord>,
}

#[derive(Debug, Deserialize)]
struct PaperRecord {
    title: Option<String>,
    url: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
}

/// Semantic Scholar API client
pub struct SemanticScholarClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    policy: PagingPolicy,
}

impl SemanticScholarClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
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
            api_key,
            policy,
        })
    }

    /// Configure client from config
    pub fn from_config(
        config: &SemanticScholarConfig,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let policy = PagingPolicy::BoundedOffset {
            page_size: config.page_size,
            max_offset: config.max_offset,
            page_delay: config.page_delay,
        };
        Self::new(
            config.api_url.clone(),
            config.api_key.clone(),
            policy,
            user_agent,
            timeout,
        )
    }
}

#[async_trait]
impl PaperSource for SemanticScholarClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn policy(&self) -> &PagingPolicy {
        &self.policy
    }

    fn match_scope(&self) -> MatchScope {
        MatchScope::FullCatalog
    }

    async fn fetch_page(
        &self,
        phrase: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<RawDocument>, SearchError> {
        let url = format!(
            "{}/paper/search?query={}&offset={}&limit={}&fields={}",
            self.base_url,
            urlencoding::encode(phrase),
            offset,
            limit,
            SEARCH_FIELDS
        );
        debug!(url = %url, "Semantic Scholar request");

        let mut request = self.client.get(&url);
        if let Some(ref key) = self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                source_name: SOURCE_NAME.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_search_response(&body)
    }
}

/// Convert a `paper/search` body into raw documents. Records without a URL
/// have no identity and are skipped; missing text fields become empty.
fn parse_search_response(body: &str) -> Result<Vec<RawDocument>, SearchError> {
    let parsed: SearchResponse = serde_json::from_str(body).map_err(|e| SearchError::Parse {
        source_name: SOURCE_NAME.to_string(),
        message: e.to_string(),
    })?;

    Ok(parsed
        .data
        .into_iter()
        .filter_map(|paper| {
            let url = paper.url.filter(|u| !u.is_empty())?;
            Some(RawDocument {
                title: paper.title.unwrap_or_default(),
                url,
                summary: paper.abstract_text.unwrap_or_default(),
                comment: None,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::testing::bounded_policy;

    fn client_for(server: &mockito::ServerGuard, api_key: Option<String>) -> SemanticScholarClient {
        SemanticScholarClient::new(
            server.url(),
            api_key,
            bounded_policy(100, 1000),
            "test-agent",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_handles_nulls_and_missing_urls() {
        let body = r#"{
            "total": 3,
            "offset": 0,
            "data": [
                {"paperId": "a", "title": "Minari datasets", "url": "https://www.semanticscholar.org/paper/a", "abstract": null},
                {"paperId": "b", "title": "No link", "url": null, "abstract": "text"},
                {"paperId": "c", "url": "https://www.semanticscholar.org/paper/c"}
            ]
        }"#;

        let docs = parse_search_response(body).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].title, "Minari datasets");
        assert_eq!(docs[0].summary, "");
        assert_eq!(docs[1].title, "");
    }

    #[test]
    fn test_parse_missing_data_is_empty() {
        let docs = parse_search_response(r#"{"total": 0, "offset": 0}"#).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_body() {
        let result = parse_search_response("<html>rate limited</html>");
        assert!(matches!(result, Err(SearchError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_fetch_page_sends_query_and_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/paper/search")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("query".into(), "Gymnasium Robotics".into()),
                mockito::Matcher::UrlEncoded("offset".into(), "100".into()),
                mockito::Matcher::UrlEncoded("limit".into(), "100".into()),
                mockito::Matcher::UrlEncoded("fields".into(), SEARCH_FIELDS.into()),
            ]))
            .match_header("x-api-key", "secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data": [{"title": "Robotics", "url": "https://s2/p1", "abstract": "Gymnasium Robotics tasks"}]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server, Some("secret".to_string()));
        let docs = client.fetch_page("Gymnasium Robotics", 100, 100).await.unwrap();

        mock.assert_async().await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].url, "https://s2/p1");
    }

    #[tokio::test]
    async fn test_fetch_page_reports_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/paper/search")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let client = client_for(&server, None);
        let result = client.fetch_page("Shimmy", 0, 100).await;
        assert!(matches!(result, Err(SearchError::Status { status: 429, .. })));
    }
}
