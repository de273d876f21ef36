//! Duplicate detection: exact link match plus fuzzy normalized-title similarity.

use rustc_hash::FxHashMap;

use super::select::SelectionState;

/// これより短い正規化タイトルは完全一致でのみ重複とみなす。
pub const MIN_FUZZY_CHARS: usize = 10;
/// 類似度がこの値以上なら重複。
pub const SIMILARITY_THRESHOLD: f64 = 0.8;

/// 候補記事が採用済み記事と重複しているか判定する。
///
/// `normalized_title` は [`crate::util::text::normalize_title`] 済みであること。
#[must_use]
pub fn is_duplicate(link: &str, normalized_title: &str, state: &SelectionState) -> bool {
    state.has_link(link)
        || state
            .seen_titles()
            .iter()
            .any(|seen| is_similar(normalized_title, seen))
}

/// 正規化済みタイトル同士の類似判定。引数の順序に依存しない。
#[must_use]
pub fn is_similar(a: &str, b: &str) -> bool {
    if a.chars().count() < MIN_FUZZY_CHARS || b.chars().count() < MIN_FUZZY_CHARS {
        return a == b;
    }
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    similarity_ratio(first, second) >= SIMILARITY_THRESHOLD
}

/// 最長一致ブロックを再帰的に集める方式の類似度 `2M / (|a| + |b|)`。
///
/// 両方空なら 1.0。
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut b2j: FxHashMap<char, Vec<usize>> = FxHashMap::default();
    for (j, ch) in b.iter().enumerate() {
        b2j.entry(*ch).or_default().push(j);
    }

    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, size) = longest_match(a, &b2j, (alo, ahi), (blo, bhi));
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            queue.push((i + size, ahi, j + size, bhi));
        }
    }
    matched
}

/// `a[alo..ahi]` と `b[blo..bhi]` の最長共通ブロック `(i, j, size)`。
/// 同じ長さなら `a` 側、次いで `b` 側で最も前にあるものを返す。
fn longest_match(
    a: &[char],
    b2j: &FxHashMap<char, Vec<usize>>,
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    let mut run_lengths: FxHashMap<usize, usize> = FxHashMap::default();

    for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: FxHashMap<usize, usize> = FxHashMap::default();
        if let Some(positions) = b2j.get(ch) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let run = j
                    .checked_sub(1)
                    .and_then(|prev| run_lengths.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next.insert(j, run);
                if run > best_size {
                    best_i = i + 1 - run;
                    best_j = j + 1 - run;
                    best_size = run;
                }
            }
        }
        run_lengths = next;
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::util::text::normalize_title;

    #[test]
    fn identical_strings_have_ratio_one() {
        assert!((similarity_ratio("abcdefghijkl", "abcdefghijkl") - 1.0).abs() < f64::EPSILON);
        assert!((similarity_ratio("", "") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn disjoint_strings_have_ratio_zero() {
        assert!(similarity_ratio("abc", "xyz").abs() < f64::EPSILON);
    }

    #[test]
    fn ratio_counts_matching_blocks_recursively() {
        // "abxcd" / "abycd": "ab" と "cd" が一致 → 2*4/10
        assert!((similarity_ratio("abxcd", "abycd") - 0.8).abs() < 1e-9);
        // 最長ブロック "bcd" の左右にさらに一致がない
        assert!((similarity_ratio("abcd", "bcda") - 0.75).abs() < 1e-9);
    }

    #[test]
    fn threshold_boundary_for_twelve_char_titles() {
        // 9文字一致 → 18/24 = 0.75
        assert!(!is_similar("abcdefghijkl", "abcdefghixyz"));
        // 11文字一致 → 22/24 ≈ 0.917
        assert!(is_similar("abcdefghijkl", "abcdefghijkz"));
    }

    #[test]
    fn short_titles_require_exact_equality() {
        let ai = normalize_title("AI");
        let ai_adoption = normalize_title("AI導入");
        assert!(!is_similar(&ai, &ai_adoption));
        assert!(is_similar(&ai, &normalize_title("ＡＩ")));
    }

    #[test]
    fn trailing_punctuation_is_a_duplicate() {
        let a = normalize_title("ChatGPTが新機能を発表");
        let b = normalize_title("ChatGPTが新機能を発表！");
        assert_eq!(a, b);
        assert!(is_similar(&a, &b));
    }

    #[test]
    fn republished_headline_with_minor_edits_is_a_duplicate() {
        let a = normalize_title("Google、新しい生成AIモデル「Gemini 2.0」を発表");
        let b = normalize_title("Googleが新しい生成AIモデル「Gemini 2.5」を発表");
        assert!(is_similar(&a, &b));
    }

    #[rstest]
    #[case("abcdefghijkl", "abcdefghixyz")]
    #[case("abcdefghijkl", "abcdefghijkz")]
    #[case("クラウド移行の最新事例を紹介", "クラウド移行の失敗事例を紹介する")]
    #[case("aaaaabbbbbcccccddddd", "dddddcccccbbbbbaaaaa")]
    #[case("xyzabcdefghijk", "abcdefghijkxyz")]
    fn is_similar_is_symmetric(#[case] a: &str, #[case] b: &str) {
        assert_eq!(is_similar(a, b), is_similar(b, a));
    }

    #[test]
    fn duplicate_by_link_or_title() {
        let mut state = SelectionState::default();
        state.record(
            "https://example.com/a",
            "Example",
            crate::taxonomy::Category::Ai,
            normalize_title("OpenAIが新しい推論モデルを公開"),
        );

        assert!(is_duplicate(
            "https://example.com/a",
            &normalize_title("まったく別のタイトルの記事です"),
            &state
        ));
        assert!(is_duplicate(
            "https://example.com/b",
            &normalize_title("OpenAIが新しい推論モデルを公開！"),
            &state
        ));
        assert!(!is_duplicate(
            "https://example.com/c",
            &normalize_title("まったく別のタイトルの記事です"),
            &state
        ));
    }
}
