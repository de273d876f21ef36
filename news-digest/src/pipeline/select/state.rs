//! Per-selection counters.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::taxonomy::Category;

/// 1回の選定中だけ存在する採用状況。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    seen_links: FxHashSet<String>,
    seen_titles: Vec<String>,
    per_source: FxHashMap<String, usize>,
    per_category: FxHashMap<Category, usize>,
}

impl SelectionState {
    #[must_use]
    pub fn has_link(&self, link: &str) -> bool {
        self.seen_links.contains(link)
    }

    /// 採用済みの正規化タイトル (採用順)。
    #[must_use]
    pub fn seen_titles(&self) -> &[String] {
        &self.seen_titles
    }

    #[must_use]
    pub fn source_count(&self, source: &str) -> usize {
        self.per_source.get(source).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn category_count(&self, category: Category) -> usize {
        self.per_category.get(&category).copied().unwrap_or(0)
    }

    #[cfg(test)]
    pub(crate) fn accepted(&self) -> usize {
        self.seen_links.len()
    }

    pub fn record(
        &mut self,
        link: &str,
        source: &str,
        category: Category,
        normalized_title: String,
    ) {
        self.seen_links.insert(link.to_string());
        self.seen_titles.push(normalized_title);
        *self.per_source.entry(source.to_string()).or_insert(0) += 1;
        *self.per_category.entry(category).or_insert(0) += 1;
    }

    /// 採用を取り消す。補充時の入れ替えでのみ使う。
    pub(crate) fn release(
        &mut self,
        link: &str,
        source: &str,
        category: Category,
        normalized_title: &str,
    ) {
        self.seen_links.remove(link);
        if let Some(position) = self.seen_titles.iter().position(|t| t == normalized_title) {
            self.seen_titles.remove(position);
        }
        if let Some(count) = self.per_source.get_mut(source) {
            *count = count.saturating_sub(1);
        }
        if let Some(count) = self.per_category.get_mut(&category) {
            *count = count.saturating_sub(1);
        }
    }
}
