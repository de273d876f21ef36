//! Composite relevance score used to order candidates before selection.

use std::sync::Arc;

use crate::{
    catalog::FeedBucket,
    taxonomy::Taxonomy,
    util::text::fold,
};

use super::{select::SelectionState, types::Article};

/// スコア各項の重み。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// バランスボーナスの初期値
    pub balance_base: f64,
    /// 同カテゴリ採用1件ごとの減衰
    pub balance_decay: f64,
    pub tier1_bonus: f64,
    pub tier2_bonus: f64,
    pub tier3_bonus: f64,
    /// 追加ソース群への一律ボーナス
    pub additional_bonus: f64,
    /// カテゴリ特徴語1語あたり
    pub strong_keyword: f64,
    /// 通常キーワード1語あたり
    pub weak_keyword: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            balance_base: 5.0,
            balance_decay: 1.0,
            tier1_bonus: 3.0,
            tier2_bonus: 2.0,
            tier3_bonus: 1.0,
            additional_bonus: 1.5,
            strong_keyword: 3.0,
            weak_keyword: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scorer {
    taxonomy: Arc<Taxonomy>,
    weights: ScoreWeights,
}

impl Scorer {
    #[must_use]
    pub fn new(taxonomy: Arc<Taxonomy>, weights: ScoreWeights) -> Self {
        Self { taxonomy, weights }
    }

    /// バランス・出自・カテゴリ・キーワード強度の合計。
    #[must_use]
    pub fn score(&self, article: &Article, state: &SelectionState) -> f64 {
        self.balance_bonus(article, state)
            + self.provenance_bonus(article.bucket)
            + self.taxonomy.bonus(article.category)
            + self.keyword_intensity(article)
    }

    /// `max(0, BASE - 採用済み同カテゴリ件数 * DECAY)`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn balance_bonus(&self, article: &Article, state: &SelectionState) -> f64 {
        let accepted = state.category_count(article.category) as f64;
        (self.weights.balance_base - accepted * self.weights.balance_decay).max(0.0)
    }

    #[must_use]
    pub fn provenance_bonus(&self, bucket: FeedBucket) -> f64 {
        match bucket {
            FeedBucket::Tier1 => self.weights.tier1_bonus,
            FeedBucket::Tier2 => self.weights.tier2_bonus,
            FeedBucket::Tier3 => self.weights.tier3_bonus,
            FeedBucket::Additional => self.weights.additional_bonus,
        }
    }

    /// 記事カテゴリの特徴語と通常キーワードがタイトルに現れた数に応じた加点。
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn keyword_intensity(&self, article: &Article) -> f64 {
        let Some(profile) = self.taxonomy.profile(article.category) else {
            return 0.0;
        };
        let title = fold(&article.title);

        let strong = profile
            .signature_terms
            .iter()
            .filter(|term| title.contains(term.as_str()))
            .count();
        let weak = profile
            .keywords
            .iter()
            .filter(|keyword| !profile.signature_terms.contains(keyword))
            .filter(|keyword| title.contains(keyword.as_str()))
            .count();

        strong as f64 * self.weights.strong_keyword + weak as f64 * self.weights.weak_keyword
    }
}
