/// 秘密値をログ出力用に伏せ字化する。先頭4文字のみ残す。
pub(crate) fn redact(input: &str) -> String {
    if input.chars().count() <= 4 {
        "****".to_string()
    } else {
        let head: String = input.chars().take(4).collect();
        format!("{head}***")
    }
}
