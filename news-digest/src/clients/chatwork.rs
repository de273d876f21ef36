//! ChatWork へのメッセージ投稿クライアント。
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, info};

use crate::{digest::DigestPoster, util::redact::redact};

const TOKEN_HEADER: &str = "X-ChatWorkToken";

#[derive(Clone)]
pub(crate) struct ChatworkConfig {
    pub(crate) base_url: String,
    pub(crate) token: String,
    pub(crate) room_id: String,
    pub(crate) timeout: Duration,
}

impl std::fmt::Debug for ChatworkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatworkConfig")
            .field("base_url", &self.base_url)
            .field("token", &redact(&self.token))
            .field("room_id", &self.room_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ChatworkClient {
    client: Client,
    messages_url: Url,
    token: String,
}

impl ChatworkClient {
    /// # Errors
    /// URLのパースまたはHTTPクライアントの構築に失敗した場合はエラーを返します。
    pub(crate) fn new(config: ChatworkConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build ChatWork HTTP client")?;

        let mut base_url = Url::parse(&config.base_url).context("invalid ChatWork base URL")?;
        // join は末尾スラッシュがないと最後のセグメントを置き換える
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let messages_url = base_url
            .join(&format!("v2/rooms/{}/messages", config.room_id))
            .context("failed to build ChatWork messages URL")?;

        debug!(
            url = %messages_url,
            token = %redact(&config.token),
            "ChatWork client configured"
        );

        Ok(Self {
            client,
            messages_url,
            token: config.token,
        })
    }

    /// ルームにメッセージを1件投稿する。
    ///
    /// # Errors
    /// リクエストが失敗した場合、または2xx以外の応答の場合はエラーを返します。
    pub(crate) async fn post_message(&self, body: &str) -> Result<()> {
        self.client
            .post(self.messages_url.clone())
            .header(TOKEN_HEADER, &self.token)
            .form(&[("body", body)])
            .send()
            .await
            .context("ChatWork message request failed")?
            .error_for_status()
            .context("ChatWork messages endpoint returned error status")?;

        info!(chars = body.chars().count(), "posted message to ChatWork");
        Ok(())
    }
}

#[async_trait]
impl DigestPoster for ChatworkClient {
    async fn post(&self, message: &str) -> Result<()> {
        self.post_message(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> ChatworkConfig {
        ChatworkConfig {
            base_url,
            token: "test-token".to_string(),
            room_id: "42".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn post_message_sends_form_body_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/rooms/42/messages"))
            .and(header("X-ChatWorkToken", "test-token"))
            .and(body_string_contains("body="))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message_id":"1"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChatworkClient::new(test_config(server.uri())).expect("client should build");

        client
            .post_message("[info]テスト[/info]")
            .await
            .expect("post should succeed");
    }

    #[tokio::test]
    async fn base_url_path_prefix_is_kept_without_trailing_slash() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chatwork/v2/rooms/42/messages"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChatworkClient::new(test_config(format!("{}/chatwork", server.uri())))
            .expect("client should build");

        client.post_message("hello").await.expect("post should succeed");
    }

    #[tokio::test]
    async fn post_message_fails_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/rooms/42/messages"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = ChatworkClient::new(test_config(server.uri())).expect("client should build");

        let error = client
            .post_message("hello")
            .await
            .expect_err("401 should fail");
        assert!(format!("{error:#}").contains("error status"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(ChatworkClient::new(test_config("not a url".to_string())).is_err());
    }

    #[test]
    fn config_debug_redacts_token() {
        let rendered = format!("{:?}", test_config("http://localhost/".to_string()));
        assert!(!rendered.contains("test-token"));
    }
}
