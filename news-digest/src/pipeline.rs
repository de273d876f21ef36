//! Digest pipeline: fetch → classify → filter → score/dedup/select → backfill.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{catalog::FeedSpec, taxonomy::Category};

pub mod classify;
pub mod dedup;
pub mod fetch;
pub mod score;
pub mod select;
pub mod types;

use classify::KeywordClassifier;
use fetch::{FeedFetcher, FeedReport};
use select::Selector;
use types::{Article, RawArticle, ScoredArticle};

/// 1回の実行結果。
#[derive(Debug, Clone)]
pub struct DigestRun {
    pub articles: Vec<ScoredArticle>,
    pub report: FeedReport,
    /// 取得した記事数
    pub fetched: usize,
    /// 関連カテゴリ絞り込み後の記事数
    pub relevant: usize,
}

pub struct DigestPipeline {
    fetcher: Arc<dyn FeedFetcher>,
    feeds: Vec<FeedSpec>,
    classifier: KeywordClassifier,
    selector: Selector,
    targets: Vec<Category>,
    limit: usize,
}

impl DigestPipeline {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn FeedFetcher>,
        feeds: Vec<FeedSpec>,
        classifier: KeywordClassifier,
        selector: Selector,
        targets: Vec<Category>,
        limit: usize,
    ) -> Self {
        Self {
            fetcher,
            feeds,
            classifier,
            selector,
            targets,
            limit,
        }
    }

    #[cfg(test)]
    pub(crate) fn targets(&self) -> &[Category] {
        &self.targets
    }

    /// 全フィードを取得して選定まで行う。
    ///
    /// 個々のフィードの失敗は [`FeedReport`] に記録され、処理は継続する。
    pub async fn run(&self) -> DigestRun {
        let (raw, report) = fetch::ingest(self.fetcher.as_ref(), &self.feeds).await;
        let fetched = raw.len();

        let candidates = self.classify(raw);
        let relevant = candidates.len();
        info!(fetched, relevant, "classified candidate articles");

        let articles = self.selector.select(candidates, self.limit, &self.targets);
        info!(
            selected = articles.len(),
            limit = self.limit,
            "selected digest articles"
        );

        DigestRun {
            articles,
            report,
            fetched,
            relevant,
        }
    }

    /// 分類し、`other` と対象外カテゴリを除く。
    fn classify(&self, raw: Vec<RawArticle>) -> Vec<Article> {
        raw.into_iter()
            .filter_map(|article| {
                let category = self.classifier.classify(&article.title);
                if category == Category::Other || !self.targets.contains(&category) {
                    debug!(title = %article.title, %category, "dropping off-topic article");
                    return None;
                }
                Some(Article::from_raw(article, category))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::{
        catalog::FeedBucket,
        pipeline::{
            fetch::{FeedEntry, FeedError},
            score::{ScoreWeights, Scorer},
        },
        taxonomy::Taxonomy,
    };

    struct StaticFetcher {
        feeds: HashMap<String, Vec<FeedEntry>>,
    }

    #[async_trait]
    impl FeedFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>, FeedError> {
            self.feeds.get(url).cloned().ok_or_else(|| {
                FeedError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE)
            })
        }
    }

    fn entry(title: &str, link: &str) -> FeedEntry {
        FeedEntry {
            title: title.to_string(),
            link: link.to_string(),
        }
    }

    fn pipeline(targets: Vec<Category>) -> DigestPipeline {
        let mut feeds = HashMap::new();
        feeds.insert(
            "https://rss.itmedia.co.jp/rss/2.0/itmedia_news.xml".to_string(),
            vec![
                entry("OpenAIが新しいGPTモデルを公開", "https://itmedia/1"),
                entry("今日の天気は晴れ", "https://itmedia/2"),
                entry("AWSとAzureのクラウド料金比較", "https://itmedia/3"),
            ],
        );
        feeds.insert(
            "https://zenn.dev/feed".to_string(),
            vec![entry("ランサムウェア被害が拡大、脆弱性を悪用", "https://zenn/1")],
        );

        let taxonomy = Arc::new(Taxonomy::default());
        DigestPipeline::new(
            Arc::new(StaticFetcher { feeds }),
            vec![
                FeedSpec::new("https://rss.itmedia.co.jp/rss/2.0/itmedia_news.xml", FeedBucket::Tier2),
                FeedSpec::new("https://zenn.dev/feed", FeedBucket::Additional),
                FeedSpec::new("https://down.example.com/rss", FeedBucket::Tier3),
            ],
            KeywordClassifier::new(&taxonomy).expect("classifier"),
            Selector::new(Arc::new(Scorer::new(taxonomy, ScoreWeights::default()))),
            targets,
            8,
        )
    }

    #[tokio::test]
    async fn run_drops_off_topic_articles_and_reports_failures() {
        let run = pipeline(Category::CLASSIFIED.to_vec()).run().await;

        assert_eq!(run.fetched, 4);
        assert_eq!(run.relevant, 3);
        assert_eq!(run.report.succeeded, 2);
        assert_eq!(run.report.failed.len(), 1);
        assert!(run
            .articles
            .iter()
            .all(|s| s.article.category != Category::Other));
    }

    #[tokio::test]
    async fn run_keeps_only_target_categories() {
        let run = pipeline(vec![Category::Security]).run().await;

        assert_eq!(run.relevant, 1);
        assert_eq!(run.articles.len(), 1);
        assert_eq!(run.articles[0].article.source, "Zenn");
        assert_eq!(run.articles[0].article.category, Category::Security);
    }
}
