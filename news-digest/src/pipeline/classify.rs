//! Keyword classifier: title → category by keyword membership counts.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use rustc_hash::FxHashSet;

use crate::{
    taxonomy::{Category, Taxonomy},
    util::text::fold,
};

/// タイトルをカテゴリに分類する。
///
/// 全カテゴリのキーワードを1つの Aho-Corasick オートマトンにまとめ、
/// 重複ありで走査してカテゴリごとに一致したキーワードの種類数を数える。
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    matcher: AhoCorasick,
    /// パターン番号 → カテゴリ番号
    owners: Vec<usize>,
    categories: Vec<Category>,
}

impl KeywordClassifier {
    /// # Errors
    /// オートマトンの構築に失敗した場合はエラーを返す。
    pub fn new(taxonomy: &Taxonomy) -> Result<Self, aho_corasick::BuildError> {
        let mut patterns = Vec::new();
        let mut owners = Vec::new();
        let mut categories = Vec::new();

        for (index, profile) in taxonomy.profiles().iter().enumerate() {
            categories.push(profile.category);
            for keyword in &profile.keywords {
                patterns.push(keyword.as_str());
                owners.push(index);
            }
        }

        let matcher = AhoCorasickBuilder::new()
            .match_kind(MatchKind::Standard)
            .build(&patterns)?;

        Ok(Self {
            matcher,
            owners,
            categories,
        })
    }

    /// カテゴリごとの一致キーワード数 (辞書の列挙順)。
    #[must_use]
    pub fn match_counts(&self, title: &str) -> Vec<(Category, usize)> {
        let folded = fold(title);
        let mut matched: FxHashSet<usize> = FxHashSet::default();
        for hit in self.matcher.find_overlapping_iter(&folded) {
            matched.insert(hit.pattern().as_usize());
        }

        let mut counts = vec![0usize; self.categories.len()];
        for pattern in matched {
            counts[self.owners[pattern]] += 1;
        }

        self.categories.iter().copied().zip(counts).collect()
    }

    /// 一致数が最大のカテゴリを返す。同数は列挙順で先のもの、一致なしは `Other`。
    #[must_use]
    pub fn classify(&self, title: &str) -> Category {
        let mut best = Category::Other;
        let mut best_count = 0;
        for (category, count) in self.match_counts(title) {
            if count > best_count {
                best = category;
                best_count = count;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::taxonomy::CategoryProfile;

    fn classifier() -> KeywordClassifier {
        KeywordClassifier::new(&Taxonomy::default()).expect("classifier builds")
    }

    #[rstest]
    #[case("OpenAIが新しいGPTモデルを公開", Category::Ai)]
    #[case("ＡＩ導入で変わる現場", Category::Ai)]
    #[case("大手メーカーで不正アクセス、情報漏えいの可能性", Category::Security)]
    #[case("AWSとAzureのクラウド料金比較", Category::Cloud)]
    #[case("スマートホーム向けIoTセンサーが登場", Category::Iot)]
    #[case("中小企業のDX、ペーパーレス化が加速", Category::Dx)]
    #[case("今日の天気は晴れ", Category::Other)]
    fn classify_assigns_expected_category(#[case] title: &str, #[case] expected: Category) {
        assert_eq!(classifier().classify(title), expected);
    }

    #[test]
    fn tie_goes_to_first_category_in_enumeration_order() {
        // ai: "ai" / cloud: "クラウド" がそれぞれ1件
        let classifier = classifier();
        let title = "AIでクラウド運用";
        let counts = classifier.match_counts(title);
        assert_eq!(counts[0], (Category::Ai, 1));
        assert_eq!(counts[2], (Category::Cloud, 1));
        assert_eq!(classifier.classify(title), Category::Ai);
    }

    #[test]
    fn each_keyword_counts_once() {
        let classifier = classifier();
        let counts = classifier.match_counts("セキュリティ、セキュリティ、セキュリティ");
        assert_eq!(counts[3], (Category::Security, 1));
    }

    #[test]
    fn overlapping_keywords_are_all_counted() {
        // "chatgpt" とその中の "gpt" を両方数える
        let classifier = classifier();
        let counts = classifier.match_counts("ChatGPT");
        assert_eq!(counts[0], (Category::Ai, 2));
    }

    #[test]
    fn shared_keyword_counts_for_every_owner() {
        let taxonomy = Taxonomy::with_overrides(vec![
            CategoryProfile::new(Category::Cloud, &["platform", "cloud"], &[], 1.0),
            CategoryProfile::new(Category::Dx, &["platform", "dx"], &[], 1.0),
        ])
        .expect("taxonomy");
        let classifier = KeywordClassifier::new(&taxonomy).expect("classifier builds");

        let counts = classifier.match_counts("new platform");

        assert_eq!(counts[2], (Category::Cloud, 1));
        assert_eq!(counts[4], (Category::Dx, 1));
        assert_eq!(classifier.classify("new platform"), Category::Cloud);
    }

    #[test]
    fn classify_is_deterministic() {
        let classifier = classifier();
        let title = "生成AIとゼロトラストで進めるDX";
        let first = classifier.classify(title);
        for _ in 0..10 {
            assert_eq!(classifier.classify(title), first);
        }
    }
}
