use std::{
    io::{self, Write},
    sync::Mutex,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use super::DigestPoster;

/// 投稿せずに標準出力へ書き出す。`DIGEST_DRY_RUN=true` で使う。
pub struct StdoutPoster<W = io::Stdout> {
    out: Mutex<W>,
}

impl StdoutPoster {
    #[must_use]
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for StdoutPoster {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> StdoutPoster<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl<W: Write + Send + 'static> DigestPoster for StdoutPoster<W> {
    async fn post(&self, message: &str) -> Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow::anyhow!("dry-run writer lock poisoned"))?;
        writeln!(out, "{message}").context("failed to write dry-run message")?;
        out.flush().context("failed to flush dry-run message")?;
        info!(chars = message.chars().count(), "dry run: message not posted");
        Ok(())
    }
}
