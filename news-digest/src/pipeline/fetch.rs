//! Feed ingestion over HTTP: RSS 0.9/1.0/2.0 and Atom via feed-rs.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::{source_name, FeedSpec};

use super::types::RawArticle;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// フィードから取り出した1エントリ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed returned error status {0}")]
    Status(StatusCode),
    #[error("feed could not be parsed: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

/// フィード取得の抽象。テストでは固定応答の実装に差し替える。
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>, FeedError>;
}

#[derive(Debug, Clone)]
pub struct FeedClientConfig {
    pub connect_timeout: Duration,
    pub total_timeout: Duration,
}

/// reqwest によるフィード取得。
#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
    /// # Errors
    /// HTTPクライアントの構築に失敗した場合はエラーを返します。
    pub fn new(config: &FeedClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(config.connect_timeout)
            .timeout(config.total_timeout)
            .build()
            .context("failed to build feed HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>, FeedError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let body = response.bytes().await?;
        parse_feed(&body)
    }
}

/// フィード本文をエントリ列に変換する。
///
/// タイトルは前後の空白を除去し、タイトルかリンクが空のエントリは捨てる。
///
/// # Errors
/// RSS/Atom として解釈できない場合は [`FeedError::Parse`] を返します。
pub fn parse_feed(body: &[u8]) -> Result<Vec<FeedEntry>, FeedError> {
    let feed = feed_rs::parser::parse(body)?;

    Ok(feed
        .entries
        .iter()
        .filter_map(|entry| {
            let title = entry.title.as_ref()?.content.trim().to_string();
            let link = entry_link(entry)?;
            (!title.is_empty()).then_some(FeedEntry { title, link })
        })
        .collect())
}

/// `rel` なしまたは `alternate` のリンクを優先し、なければ最初の空でないリンク。
fn entry_link(entry: &feed_rs::model::Entry) -> Option<String> {
    let candidates = || {
        entry
            .links
            .iter()
            .map(|link| (link.rel.as_deref(), link.href.trim()))
            .filter(|(_, href)| !href.is_empty())
    };

    candidates()
        .find(|(rel, _)| rel.is_none_or(|rel| rel.eq_ignore_ascii_case("alternate")))
        .or_else(|| candidates().next())
        .map(|(_, href)| href.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFailure {
    pub url: String,
    pub source: String,
    pub error: String,
}

/// 取得結果の集計。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedReport {
    pub succeeded: usize,
    pub failed: Vec<FeedFailure>,
}

impl FeedReport {
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed.len()
    }
}

/// 全フィードを順に取得する。失敗したフィードは警告を出して読み飛ばす。
pub async fn ingest(fetcher: &dyn FeedFetcher, feeds: &[FeedSpec]) -> (Vec<RawArticle>, FeedReport) {
    let mut articles = Vec::new();
    let mut report = FeedReport::default();

    for feed in feeds {
        let source = source_name(&feed.url);
        match fetcher.fetch(&feed.url).await {
            Ok(entries) => {
                debug!(
                    feed = %feed.url,
                    source,
                    bucket = feed.bucket.as_str(),
                    entries = entries.len(),
                    "fetched feed"
                );
                report.succeeded += 1;
                articles.extend(entries.into_iter().map(|entry| RawArticle {
                    title: entry.title,
                    link: entry.link,
                    source: source.to_string(),
                    bucket: feed.bucket,
                }));
            }
            Err(error) => {
                warn!(feed = %feed.url, source, error = %error, "failed to fetch feed");
                report.failed.push(FeedFailure {
                    url: feed.url.clone(),
                    source: source.to_string(),
                    error: error.to_string(),
                });
            }
        }
    }

    info!(
        succeeded = report.succeeded,
        failed = report.failed.len(),
        articles = articles.len(),
        "feed ingestion finished"
    );

    (articles, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FeedBucket;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RSS2: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>ITmedia NEWS</title>
    <link>https://www.itmedia.co.jp/news/</link>
    <description>IT news</description>
    <item>
      <title>  生成AIの業務利用が拡大  </title>
      <link>https://www.itmedia.co.jp/news/articles/1.html</link>
    </item>
    <item>
      <title></title>
      <link>https://www.itmedia.co.jp/news/articles/2.html</link>
    </item>
    <item>
      <title>リンクのない記事</title>
    </item>
  </channel>
</rss>"#;

    const RDF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns="http://purl.org/rss/1.0/">
  <channel rdf:about="https://japan.cnet.com/">
    <title>CNET Japan</title>
    <link>https://japan.cnet.com/</link>
    <description>CNET</description>
  </channel>
  <item rdf:about="https://japan.cnet.com/article/1/">
    <title>クラウド移行の実態調査</title>
    <link>https://japan.cnet.com/article/1/</link>
  </item>
</rdf:RDF>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Publickey</title>
  <id>https://www.publickey1.jp/</id>
  <updated>2025-01-01T00:00:00Z</updated>
  <entry>
    <title>Kubernetes 1.32 がリリース</title>
    <id>tag:publickey1.jp,2025:1</id>
    <updated>2025-01-01T00:00:00Z</updated>
    <link rel="replies" href="https://www.publickey1.jp/blog/1.html#comments"/>
    <link rel="alternate" href="https://www.publickey1.jp/blog/1.html"/>
  </entry>
</feed>"#;

    async fn serve(body: &'static str, status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    fn fetcher() -> HttpFeedFetcher {
        HttpFeedFetcher::new(&FeedClientConfig {
            connect_timeout: Duration::from_secs(2),
            total_timeout: Duration::from_secs(5),
        })
        .expect("client should build")
    }

    #[tokio::test]
    async fn fetch_parses_rss2_and_skips_incomplete_items() {
        let server = serve(RSS2, 200).await;

        let entries = fetcher()
            .fetch(&format!("{}/feed", server.uri()))
            .await
            .expect("rss should parse");

        assert_eq!(
            entries,
            vec![FeedEntry {
                title: "生成AIの業務利用が拡大".to_string(),
                link: "https://www.itmedia.co.jp/news/articles/1.html".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn fetch_parses_rdf() {
        let server = serve(RDF, 200).await;

        let entries = fetcher()
            .fetch(&format!("{}/feed", server.uri()))
            .await
            .expect("rdf should parse");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "クラウド移行の実態調査");
        assert_eq!(entries[0].link, "https://japan.cnet.com/article/1/");
    }

    #[test]
    fn atom_prefers_alternate_link() {
        let entries = parse_feed(ATOM.as_bytes()).expect("atom should parse");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].link, "https://www.publickey1.jp/blog/1.html");
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = serve("", 404).await;

        let error = fetcher()
            .fetch(&format!("{}/feed", server.uri()))
            .await
            .expect_err("404 should fail");

        assert!(matches!(error, FeedError::Status(StatusCode::NOT_FOUND)));
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = serve("<html><body>not a feed</body></html>", 200).await;

        let error = fetcher()
            .fetch(&format!("{}/feed", server.uri()))
            .await
            .expect_err("html should not parse");

        assert!(matches!(error, FeedError::Parse(_)));
    }

    #[tokio::test]
    async fn ingest_skips_failed_feeds_and_counts_them() {
        let server = serve(RSS2, 200).await;
        let missing = MockServer::start().await;
        let feeds = vec![
            FeedSpec::new(&format!("{}/feed", server.uri()), FeedBucket::Tier2),
            FeedSpec::new(&format!("{}/feed", missing.uri()), FeedBucket::Tier1),
        ];

        let (articles, report) = ingest(&fetcher(), &feeds).await;

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].bucket, FeedBucket::Tier2);
        assert_eq!(articles[0].source, "その他");
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.attempted(), 2);
        assert_eq!(report.failed[0].url, feeds[1].url);
    }
}
