//! Types shared by the pipeline stages.

use crate::{catalog::FeedBucket, taxonomy::Category};

/// フィードから取り出したままの記事。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArticle {
    pub title: String,
    pub link: String,
    pub source: String,
    pub bucket: FeedBucket,
}

/// カテゴリ付与済みの記事。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub source: String,
    pub bucket: FeedBucket,
    pub category: Category,
}

impl Article {
    #[must_use]
    pub fn from_raw(raw: RawArticle, category: Category) -> Self {
        Self {
            title: raw.title,
            link: raw.link,
            source: raw.source,
            bucket: raw.bucket,
            category,
        }
    }
}

/// 選定結果。スコアは並べ替えにのみ使う。
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredArticle {
    pub article: Article,
    pub score: f64,
}
