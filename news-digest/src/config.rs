use std::{env, fmt, num::NonZeroUsize, path::PathBuf, time::Duration};

use thiserror::Error;

use crate::{taxonomy::Category, util::redact::redact};

#[derive(Clone, PartialEq)]
pub struct Config {
    chatwork_token: String,
    chatwork_room_id: String,
    chatwork_base_url: String,
    chatwork_timeout: Duration,
    news_limit: NonZeroUsize,
    feed_timeout: Duration,
    feed_connect_timeout: Duration,
    target_categories: Vec<Category>,
    profile_path: Option<PathBuf>,
    dry_run: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl Config {
    /// 環境変数からダイジェストジョブの設定値を読み込み、検証する。
    ///
    /// # Errors
    /// `CHATWORK_TOKEN` / `CHATWORK_ROOM_ID` が未設定、もしくは各種値のパースに失敗した場合は
    /// [`ConfigError`] を返す。
    pub fn from_env() -> Result<Self, ConfigError> {
        let chatwork_token = env_var("CHATWORK_TOKEN")?;
        let chatwork_room_id = env_var("CHATWORK_ROOM_ID")?;
        let chatwork_base_url = env::var("CHATWORK_BASE_URL")
            .unwrap_or_else(|_| "https://api.chatwork.com/".to_string());
        let chatwork_timeout = parse_duration_secs("CHATWORK_TIMEOUT_SECS", 30)?;

        let news_limit = parse_non_zero_usize("NEWS_LIMIT", 8)?;
        let feed_timeout = parse_duration_secs("FEED_TIMEOUT_SECS", 15)?;
        let feed_connect_timeout = parse_duration_ms("FEED_CONNECT_TIMEOUT_MS", 5000)?;
        let target_categories =
            parse_categories("DIGEST_TARGET_CATEGORIES", "ai,iot,cloud,security,dx")?;
        let profile_path = env::var("DIGEST_PROFILE_PATH")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);
        let dry_run = parse_bool("DIGEST_DRY_RUN", false)?;

        Ok(Self {
            chatwork_token,
            chatwork_room_id,
            chatwork_base_url,
            chatwork_timeout,
            news_limit,
            feed_timeout,
            feed_connect_timeout,
            target_categories,
            profile_path,
            dry_run,
        })
    }

    #[must_use]
    pub fn chatwork_token(&self) -> &str {
        &self.chatwork_token
    }

    #[must_use]
    pub fn chatwork_room_id(&self) -> &str {
        &self.chatwork_room_id
    }

    #[must_use]
    pub fn chatwork_base_url(&self) -> &str {
        &self.chatwork_base_url
    }

    #[must_use]
    pub fn chatwork_timeout(&self) -> Duration {
        self.chatwork_timeout
    }

    #[must_use]
    pub fn news_limit(&self) -> NonZeroUsize {
        self.news_limit
    }

    #[must_use]
    pub fn feed_timeout(&self) -> Duration {
        self.feed_timeout
    }

    #[must_use]
    pub fn feed_connect_timeout(&self) -> Duration {
        self.feed_connect_timeout
    }

    /// 対象カテゴリ (補充の優先順)。
    #[must_use]
    pub fn target_categories(&self) -> &[Category] {
        &self.target_categories
    }

    #[must_use]
    pub fn profile_path(&self) -> Option<&PathBuf> {
        self.profile_path.as_ref()
    }

    #[must_use]
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("chatwork_token", &redact(&self.chatwork_token))
            .field("chatwork_room_id", &self.chatwork_room_id)
            .field("chatwork_base_url", &self.chatwork_base_url)
            .field("chatwork_timeout", &self.chatwork_timeout)
            .field("news_limit", &self.news_limit)
            .field("feed_timeout", &self.feed_timeout)
            .field("feed_connect_timeout", &self.feed_connect_timeout)
            .field("target_categories", &self.target_categories)
            .field("profile_path", &self.profile_path)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

fn env_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_non_zero_usize(name: &'static str, default: usize) -> Result<NonZeroUsize, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    let parsed = raw.trim().parse::<usize>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })?;
    NonZeroUsize::new(parsed).ok_or_else(|| ConfigError::Invalid {
        name,
        source: anyhow::anyhow!("must be greater than zero"),
    })
}

fn parse_duration_secs(name: &'static str, default_secs: u64) -> Result<Duration, ConfigError> {
    let value = parse_u64(name, default_secs)?;
    Ok(Duration::from_secs(value))
}

fn parse_duration_ms(name: &'static str, default_ms: u64) -> Result<Duration, ConfigError> {
    let ms = parse_u64(name, default_ms)?;
    Ok(Duration::from_millis(ms))
}

fn parse_u64(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.trim().parse::<u64>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            source: anyhow::anyhow!("invalid boolean value: {raw}"),
        }),
    }
}

fn parse_csv(name: &'static str, default: &str) -> Vec<String> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// 重複は先勝ちで除き、`other` と空指定は拒否する。
fn parse_categories(name: &'static str, default: &str) -> Result<Vec<Category>, ConfigError> {
    let mut categories = Vec::new();
    for raw in parse_csv(name, default) {
        let category = raw.parse::<Category>().map_err(|error| ConfigError::Invalid {
            name,
            source: anyhow::Error::new(error),
        })?;
        if category == Category::Other {
            return Err(ConfigError::Invalid {
                name,
                source: anyhow::anyhow!("`other` cannot be a target category"),
            });
        }
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    if categories.is_empty() {
        return Err(ConfigError::Invalid {
            name,
            source: anyhow::anyhow!("at least one target category is required"),
        });
    }
    Ok(categories)
}
