//! Optional YAML profile overriding the built-in taxonomy and feed catalog.

use std::path::Path;

use reqwest::Url;
use serde::Deserialize;

use crate::{
    catalog::{default_feeds, FeedSpec},
    taxonomy::{CategoryProfile, ProfileError, Taxonomy},
};

/// `DIGEST_PROFILE_PATH` で指定される上書き設定。
///
/// ```yaml
/// categories:
///   - category: dx
///     keywords: [dx, ペーパーレス]
///     signature_terms: [dx]
///     bonus: 1.5
/// feeds:
///   - url: https://zenn.dev/feed
///     bucket: additional
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DigestProfile {
    #[serde(default)]
    pub categories: Option<Vec<CategoryProfile>>,
    #[serde(default)]
    pub feeds: Option<Vec<FeedSpec>>,
}

impl DigestProfile {
    /// # Errors
    /// 読み込み・パース・検証のいずれかに失敗した場合は [`ProfileError`] を返します。
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let raw = std::fs::read_to_string(path).map_err(|error| ProfileError::Read {
            path: path.display().to_string(),
            reason: error.to_string(),
        })?;
        Self::parse(&raw).map_err(|error| match error {
            ProfileError::Parse { reason, .. } => ProfileError::Parse {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// # Errors
    /// YAML として不正な場合や、フィード一覧が検証に失敗した場合はエラーを返します。
    pub fn parse(raw: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_yaml::from_str(raw).map_err(|error| ProfileError::Parse {
            path: "<inline>".to_string(),
            reason: error.to_string(),
        })?;
        if let Some(feeds) = &profile.feeds {
            validate_feeds(feeds)?;
        }
        Ok(profile)
    }

    /// 上書きを適用したカテゴリ辞書。
    ///
    /// # Errors
    /// 適用後の辞書が不完全な場合は [`ProfileError`] を返します。
    pub fn taxonomy(&self) -> Result<Taxonomy, ProfileError> {
        match &self.categories {
            Some(overrides) => Taxonomy::with_overrides(overrides.clone()),
            None => Ok(Taxonomy::default()),
        }
    }

    /// 上書きがあればその一覧、なければ組み込みのフィード一覧。
    #[must_use]
    pub fn feeds(&self) -> Vec<FeedSpec> {
        self.feeds.clone().unwrap_or_else(default_feeds)
    }
}

fn validate_feeds(feeds: &[FeedSpec]) -> Result<(), ProfileError> {
    if feeds.is_empty() {
        return Err(ProfileError::EmptyFeeds);
    }
    for feed in feeds {
        let url = Url::parse(&feed.url).map_err(|error| ProfileError::InvalidFeedUrl {
            url: feed.url.clone(),
            reason: error.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ProfileError::InvalidFeedUrl {
                url: feed.url.clone(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }
    }
    Ok(())
}
