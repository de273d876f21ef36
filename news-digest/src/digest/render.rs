//! ChatWork 記法でのメッセージ組み立て。

use chrono::{DateTime, FixedOffset};
use rustc_hash::FxHashMap;

use crate::{pipeline::types::ScoredArticle, taxonomy::Category};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const TITLE_MAX_CHARS: usize = 75;
const TITLE_KEEP_CHARS: usize = 72;
const TOP_SOURCES: usize = 5;

/// 75文字を超えるタイトルは72文字 + `...` に切り詰める。
#[must_use]
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() > TITLE_MAX_CHARS {
        let head: String = title.chars().take(TITLE_KEEP_CHARS).collect();
        format!("{head}...")
    } else {
        title.to_string()
    }
}

/// 件数の多い順 (同数は初出順) の情報源一覧。
fn source_counts(articles: &[ScoredArticle]) -> Vec<(&str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for scored in articles {
        let source = scored.article.source.as_str();
        match counts.iter_mut().find(|(name, _)| *name == source) {
            Some((_, count)) => *count += 1,
            None => counts.push((source, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn category_counts(articles: &[ScoredArticle]) -> Vec<(Category, usize)> {
    let mut counts: FxHashMap<Category, usize> = FxHashMap::default();
    for scored in articles {
        *counts.entry(scored.article.category).or_insert(0) += 1;
    }
    let mut counts: Vec<(Category, usize)> = counts.into_iter().collect();
    counts.sort_by_key(|(category, _)| *category);
    counts
}

/// 選定済み記事のダイジェスト本文。
#[must_use]
pub fn build_digest_message(articles: &[ScoredArticle], now: DateTime<FixedOffset>) -> String {
    let sources = source_counts(articles);

    let mut lines = vec![
        format!(
            "[info][title]🤖 本日のITニュース - {}[/title]",
            now.format("%Y年%m月%d日")
        ),
        format!("📅 配信時刻: {}", now.format("%H:%M")),
        format!("📊 記事数: {}件", articles.len()),
        format!("📡 情報源: {}サイト", sources.len()),
        String::new(),
        RULE.to_string(),
        String::new(),
    ];

    for (index, scored) in articles.iter().enumerate() {
        let article = &scored.article;
        lines.push(format!(
            "📰 【記事 {}】[{}] ({})",
            index + 1,
            article.category.label(),
            article.source
        ));
        lines.push(format!("💡 {}", truncate_title(&article.title)));
        lines.push(format!("🔗 {}", article.link));
        lines.push(String::new());
    }

    if sources.len() > 1 {
        lines.push(RULE.to_string());
        lines.push("📈 主要情報源:".to_string());
        lines.push(String::new());
        for (source, count) in sources.iter().take(TOP_SOURCES) {
            lines.push(format!("　• {source}: {count}件"));
        }
        lines.push(String::new());
    }

    let categories = category_counts(articles);
    if !categories.is_empty() {
        lines.push(RULE.to_string());
        lines.push("🏷️ カテゴリ内訳:".to_string());
        lines.push(String::new());
        for (category, count) in categories {
            lines.push(format!("　• {}: {count}件", category.label()));
        }
        lines.push(String::new());
    }

    lines.push(RULE.to_string());
    lines.push("✨ 最新のIT情報をお届けしました！".to_string());
    lines.push("📱 気になる記事があればリンクをクリックしてご覧ください。".to_string());
    lines.push("[/info]".to_string());

    lines.join("\n")
}

/// 採用記事が0件だった日のメッセージ。
#[must_use]
pub fn build_no_news_message(now: DateTime<FixedOffset>) -> String {
    [
        format!(
            "[info][title]🤖 本日のITニュース - {}[/title]",
            now.format("%Y年%m月%d日")
        ),
        format!("📅 配信時刻: {}", now.format("%H:%M")),
        "📊 記事数: 0件".to_string(),
        String::new(),
        RULE.to_string(),
        String::new(),
        "🔍 申し訳ございません。本日は新しいIT関連記事が見つかりませんでした。".to_string(),
        "📰 明日また最新情報をお届けいたします！".to_string(),
        String::new(),
        RULE.to_string(),
        "[/info]".to_string(),
    ]
    .join("\n")
}

/// 実行失敗時の通知メッセージ。
#[must_use]
pub fn build_error_message(now: DateTime<FixedOffset>) -> String {
    [
        format!(
            "[info][title]⚠️ システム通知 - {}[/title]",
            now.format("%Y年%m月%d日")
        ),
        format!("📅 通知時刻: {}", now.format("%H:%M")),
        String::new(),
        RULE.to_string(),
        String::new(),
        "🚨 ITニュース配信でエラーが発生しました。".to_string(),
        "🔧 システム管理者にご確認ください。".to_string(),
        "🕐 次回の配信をお待ちください。".to_string(),
        String::new(),
        RULE.to_string(),
        "[/info]".to_string(),
    ]
    .join("\n")
}
