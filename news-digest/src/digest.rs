//! Digest delivery: message rendering and posting.

pub mod dry_run;
pub mod render;

use anyhow::Result;
use async_trait::async_trait;

pub use dry_run::StdoutPoster;
pub use render::{build_digest_message, build_error_message, build_no_news_message};

/// 完成したメッセージの投稿先。
#[async_trait]
pub trait DigestPoster: Send + Sync {
    /// # Errors
    /// 投稿に失敗した場合はエラーを返す。
    async fn post(&self, message: &str) -> Result<()>;
}
