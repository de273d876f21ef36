use chrono::{DateTime, FixedOffset, Utc};

const JST_OFFSET_HOURS: i32 = 9;

/// 日本標準時 (UTC+9) のオフセット。
#[must_use]
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_HOURS * 3600).expect("valid JST offset")
}

/// 現在時刻をJSTで返す。
#[must_use]
pub fn jst_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&jst())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jst_is_nine_hours_ahead() {
        assert_eq!(jst().local_minus_utc(), 9 * 3600);
    }
}
