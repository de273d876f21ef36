//! Selection: score once, greedy dedup/source-cap walk, then category backfill.

mod backfill;
mod state;

use std::sync::Arc;

use tracing::debug;

pub use state::SelectionState;

use crate::{taxonomy::Category, util::text::normalize_title};

use super::{
    dedup::is_duplicate,
    score::Scorer,
    types::{Article, ScoredArticle},
};

/// 選定中の候補。正規化タイトルは一度だけ計算する。
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub(crate) article: Article,
    pub(crate) score: f64,
    pub(crate) normalized_title: String,
}

impl Candidate {
    fn record(&self, state: &mut SelectionState) {
        state.record(
            &self.article.link,
            &self.article.source,
            self.article.category,
            self.normalized_title.clone(),
        );
    }

    fn release(&self, state: &mut SelectionState) {
        state.release(
            &self.article.link,
            &self.article.source,
            self.article.category,
            &self.normalized_title,
        );
    }
}

/// 1ソースあたりの採用上限 `max(1, limit / 3)`。
#[must_use]
pub fn source_cap(limit: usize) -> usize {
    (limit / 3).max(1)
}

#[derive(Debug, Clone)]
pub struct Selector {
    scorer: Arc<Scorer>,
}

impl Selector {
    #[must_use]
    pub fn new(scorer: Arc<Scorer>) -> Self {
        Self { scorer }
    }

    /// 最大 `limit` 件の記事を選ぶ。
    ///
    /// スコアは空の採用状況に対して一度だけ計算し、降順に並べてから
    /// 重複とソース上限で絞り込む。不足する対象カテゴリは最後に補充する。
    #[must_use]
    pub fn select(
        &self,
        articles: Vec<Article>,
        limit: usize,
        targets: &[Category],
    ) -> Vec<ScoredArticle> {
        if limit == 0 || articles.is_empty() {
            return Vec::new();
        }

        let candidates = self.rank(articles);
        let cap = source_cap(limit);
        let mut state = SelectionState::default();
        let mut picked: Vec<usize> = Vec::with_capacity(limit);

        for (index, candidate) in candidates.iter().enumerate() {
            if picked.len() >= limit {
                break;
            }
            if is_duplicate(
                &candidate.article.link,
                &candidate.normalized_title,
                &state,
            ) {
                debug!(link = %candidate.article.link, "skipping duplicate article");
                continue;
            }
            if state.source_count(&candidate.article.source) >= cap {
                debug!(
                    source = %candidate.article.source,
                    cap,
                    "skipping article over per-source cap"
                );
                continue;
            }
            candidate.record(&mut state);
            picked.push(index);
        }

        backfill::fill_missing_categories(
            &candidates,
            &mut picked,
            &mut state,
            backfill::Limits { limit, cap },
            targets,
        );

        picked
            .into_iter()
            .map(|index| {
                let candidate = &candidates[index];
                ScoredArticle {
                    article: candidate.article.clone(),
                    score: candidate.score,
                }
            })
            .collect()
    }

    /// 空の採用状況でスコアを付け、降順に安定ソートする。
    fn rank(&self, articles: Vec<Article>) -> Vec<Candidate> {
        let initial = SelectionState::default();
        let mut candidates: Vec<Candidate> = articles
            .into_iter()
            .map(|article| Candidate {
                score: self.scorer.score(&article, &initial),
                normalized_title: normalize_title(&article.title),
                article,
            })
            .collect();
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates
    }
}
