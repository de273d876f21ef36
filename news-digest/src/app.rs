//! Job wiring: builds the pipeline from [`Config`] and delivers exactly one message per run.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::{
    clients::{ChatworkClient, ChatworkConfig},
    config::Config,
    digest::{
        DigestPoster, StdoutPoster, build_digest_message, build_error_message,
        build_no_news_message,
    },
    pipeline::{
        DigestPipeline, DigestRun,
        classify::KeywordClassifier,
        fetch::{FeedClientConfig, HttpFeedFetcher},
        score::{ScoreWeights, Scorer},
        select::Selector,
    },
    profile::DigestProfile,
    util::time::jst_now,
};

/// 1回の実行で何を投稿したか。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestOutcome {
    /// ダイジェストを投稿した
    Posted { articles: usize },
    /// 採用記事なしのお知らせを投稿した
    NoArticles,
    /// 失敗し、エラー通知を投稿した
    ErrorNotified,
    /// エラー通知の投稿にも失敗した
    NotificationFailed,
}

pub struct DigestJob {
    pipeline: DigestPipeline,
    poster: Arc<dyn DigestPoster>,
}

impl DigestJob {
    #[must_use]
    pub fn new(pipeline: DigestPipeline, poster: Arc<dyn DigestPoster>) -> Self {
        Self { pipeline, poster }
    }

    /// 設定からジョブ一式を組み立てる。
    ///
    /// # Errors
    /// プロファイルの読み込み・検証、または HTTP クライアントの構築に失敗した場合はエラーを返す。
    pub fn from_config(config: &Config) -> Result<Self> {
        let profile = match config.profile_path() {
            Some(path) => {
                info!(path = %path.display(), "loading digest profile");
                DigestProfile::load(path).context("failed to load digest profile")?
            }
            None => DigestProfile::default(),
        };

        let taxonomy = Arc::new(profile.taxonomy().context("invalid category profile")?);
        taxonomy
            .validate_targets(config.target_categories())
            .context("invalid target categories")?;
        let feeds = profile.feeds();

        let fetcher = HttpFeedFetcher::new(&FeedClientConfig {
            connect_timeout: config.feed_connect_timeout(),
            total_timeout: config.feed_timeout(),
        })?;
        let classifier =
            KeywordClassifier::new(&taxonomy).context("failed to build keyword matcher")?;
        let selector = Selector::new(Arc::new(Scorer::new(
            Arc::clone(&taxonomy),
            ScoreWeights::default(),
        )));

        let poster: Arc<dyn DigestPoster> = if config.dry_run() {
            info!("dry run enabled; messages will be written to stdout");
            Arc::new(StdoutPoster::new())
        } else {
            Arc::new(ChatworkClient::new(ChatworkConfig {
                base_url: config.chatwork_base_url().to_string(),
                token: config.chatwork_token().to_string(),
                room_id: config.chatwork_room_id().to_string(),
                timeout: config.chatwork_timeout(),
            })?)
        };

        info!(
            feeds = feeds.len(),
            limit = config.news_limit().get(),
            targets = ?config.target_categories(),
            "digest job configured"
        );

        let pipeline = DigestPipeline::new(
            Arc::new(fetcher),
            feeds,
            classifier,
            selector,
            config.target_categories().to_vec(),
            config.news_limit().get(),
        );

        Ok(Self::new(pipeline, poster))
    }

    /// パイプラインを実行し、ダイジェスト・記事なし・エラー通知のいずれか1通を投稿する。
    pub async fn run(&self) -> DigestOutcome {
        let run = self.pipeline.run().await;
        log_summary(&run);

        if run.articles.is_empty() {
            warn!("no articles selected for today's digest");
            return match self.poster.post(&build_no_news_message(jst_now())).await {
                Ok(()) => DigestOutcome::NoArticles,
                Err(err) => self.notify_failure(&err).await,
            };
        }

        let count = run.articles.len();
        match self
            .poster
            .post(&build_digest_message(&run.articles, jst_now()))
            .await
        {
            Ok(()) => {
                info!(articles = count, "digest posted");
                DigestOutcome::Posted { articles: count }
            }
            Err(err) => self.notify_failure(&err).await,
        }
    }

    async fn notify_failure(&self, err: &anyhow::Error) -> DigestOutcome {
        error!(error = ?err, "digest run failed");
        match self.poster.post(&build_error_message(jst_now())).await {
            Ok(()) => DigestOutcome::ErrorNotified,
            Err(notify_err) => {
                error!(error = ?notify_err, "failed to post error notification");
                DigestOutcome::NotificationFailed
            }
        }
    }
}

fn log_summary(run: &DigestRun) {
    for failure in &run.report.failed {
        warn!(
            feed = %failure.url,
            source = %failure.source,
            error = %failure.error,
            "feed skipped"
        );
    }

    let mut by_category: Vec<(&str, usize)> = Vec::new();
    for scored in &run.articles {
        let label = scored.article.category.as_str();
        match by_category.iter_mut().find(|(name, _)| *name == label) {
            Some((_, count)) => *count += 1,
            None => by_category.push((label, 1)),
        }
    }

    info!(
        feeds_ok = run.report.succeeded,
        feeds_failed = run.report.failed.len(),
        fetched = run.fetched,
        relevant = run.relevant,
        selected = run.articles.len(),
        categories = ?by_category,
        "digest run summary"
    );
}
