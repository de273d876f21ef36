//! タイトル照合用のテキスト正規化。
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// 句読点・記号・数字・空白 (全角/半角とも) に一致するパターン。
static TITLE_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{P}\p{S}\p{Nd}\s]+").expect("valid title noise pattern"));

/// キーワード照合用に NFKC 正規化して小文字化する。
///
/// 全角の `ＡＩ` と半角の `AI` はどちらも `ai` になります。
#[must_use]
pub fn fold(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// 重複判定用にタイトルを正規化する。
///
/// [`fold`] の後、句読点・記号・数字・空白をすべて取り除きます。
#[must_use]
pub fn normalize_title(title: &str) -> String {
    TITLE_NOISE.replace_all(&fold(title), "").into_owned()
}
