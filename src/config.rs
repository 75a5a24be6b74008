use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub arxiv: ArxivConfig,
    pub semantic_scholar: SemanticScholarConfig,
    pub run: RunConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArxivConfig {
    pub enabled: bool,
    pub api_url: String,
    pub page_size: usize,
    pub page_delay: Duration,
    pub empty_page_attempts: u32,
    pub retry_pause: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SemanticScholarConfig {
    pub enabled: bool,
    pub api_url: String,
    pub api_key: Option<String>,
    pub page_size: usize,
    pub max_offset: usize,
    pub page_delay: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub passes: usize,
    pub pass_pause: Duration,
    pub output: PathBuf,
    pub user_agent: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub filter: String,
    pub dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            arxiv: ArxivConfig {
                enabled: env::var("ARXIV_ENABLED")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()?,
                api_url: env::var("ARXIV_API_URL")
                    .unwrap_or_else(|_| "http://export.arxiv.org/api/query".to_string()),
                page_size: env::var("ARXIV_PAGE_SIZE")
                    .unwrap_or_else(|_| "100".to_string())
                    .parse()?,
                page_delay: Duration::from_millis(
                    env::var("ARXIV_PAGE_DELAY_MS")
                        .unwrap_or_else(|_| "500".to_string())
                        .parse()?,
                ),
                empty_page_attempts: env::var("ARXIV_EMPTY_PAGE_ATTEMPTS")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()?,
                retry_pause: Duration::from_millis(
                    env::var("ARXIV_RETRY_PAUSE_MS")
                        .unwrap_or_else(|_| "1000".to_string())
                        .parse()?,
                ),
            },
            semantic_scholar: SemanticScholarConfig {
                enabled: env::var("SEMANTIC_SCHOLAR_ENABLED")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()?,
                api_url: env::var("SEMANTIC_SCHOLAR_API_URL")
                    .unwrap_or_else(|_| "https://api.semanticscholar.org/graph/v1".to_string()),
                api_key: env::var("SEMANTIC_SCHOLAR_API_KEY")
                    .ok()
                    .filter(|k| !k.is_empty()),
                page_size: env::var("SEMANTIC_SCHOLAR_PAGE_SIZE")
                    .unwrap_or_else(|_| "100".to_string())
                    .parse()?,
                max_offset: env::var("SEMANTIC_SCHOLAR_MAX_OFFSET")
                    .unwrap_or_else(|_| "1000".to_string())
                    .parse()?,
                page_delay: Duration::from_millis(
                    env::var("SEMANTIC_SCHOLAR_PAGE_DELAY_MS")
                        .unwrap_or_else(|_| "1000".to_string())
                        .parse()?,
                ),
            },
            run: RunConfig {
                passes: env::var("SCOUT_PASSES")
                    .unwrap_or_else(|_| "3".to_string())
                    .parse()?,
                pass_pause: Duration::from_secs(
                    env::var("SCOUT_PASS_PAUSE_SECS")
                        .unwrap_or_else(|_| "5".to_string())
                        .parse()?,
                ),
                output: env::var("SCOUT_OUTPUT")
                    .unwrap_or_else(|_| "csv/farama_all_papers.csv".to_string())
                    .into(),
                user_agent: env::var("SCOUT_USER_AGENT")
                    .unwrap_or_else(|_| "FaramaPaperScraper/1.0".to_string()),
                request_timeout: Duration::from_secs(
                    env::var("SCOUT_REQUEST_TIMEOUT_SECS")
                        .unwrap_or_else(|_| "30".to_string())
                        .parse()?,
                ),
            },
            log: LogConfig {
                filter: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "citation_scout=info".to_string()),
                dir: env::var("SCOUT_LOG_DIR").ok().map(PathBuf::from),
            },
        })
    }
}
