use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::{DeliveryError, MessageContext};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Sends replies back into the chat a message came from.
///
/// Both operations reply to `ctx.message_id` in `ctx.chat_id` and make exactly
/// one outbound call. Failures are returned to the caller, never retried.
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn send_text(&self, ctx: &MessageContext, text: &str) -> Result<(), DeliveryError>;

    /// Upload the image at `photo` as a photo reply.
    async fn send_photo(&self, ctx: &MessageContext, photo: &Path) -> Result<(), DeliveryError>;
}

/// Connection settings for [`BotApi`].
#[derive(Clone)]
pub struct BotApiConfig {
    pub token: String,
    /// Bot API base URL without trailing slash.
    pub api_url: String,
    pub timeout: Duration,
}

impl BotApiConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl fmt::Debug for BotApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotApiConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// [`ReplySender`] talking to the Telegram Bot API over HTTPS.
#[derive(Clone)]
pub struct BotApi {
    client: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for BotApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotApi").finish_non_exhaustive()
    }
}

impl BotApi {
    pub fn new(cfg: &BotApiConfig) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(DeliveryError::Client)?;
        Ok(Self {
            client,
            base_url: format!("{}/bot{}", cfg.api_url.trim_end_matches('/'), cfg.token),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    async fn check_response(
        method: &'static str,
        response: reqwest::Response,
    ) -> Result<(), DeliveryError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| DeliveryError::transport(method, err))?;
        let parsed = serde_json::from_str::<Value>(&body).ok();
        let ok = parsed
            .as_ref()
            .and_then(|data| data.get("ok"))
            .and_then(Value::as_bool);

        if status.is_success() && ok != Some(false) {
            return Ok(());
        }

        let description = parsed
            .as_ref()
            .and_then(|data| data.get("description"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(body);
        Err(DeliveryError::Api {
            method,
            status: status.as_u16(),
            description,
        })
    }
}

#[async_trait]
impl ReplySender for BotApi {
    async fn send_text(&self, ctx: &MessageContext, text: &str) -> Result<(), DeliveryError> {
        const METHOD: &str = "sendMessage";
        let body = json!({
            "chat_id": ctx.chat_id,
            "text": text,
            "reply_to_message_id": ctx.message_id,
        });

        let response = self
            .client
            .post(self.method_url(METHOD))
            .json(&body)
            .send()
            .await
            .map_err(|err| DeliveryError::transport(METHOD, err))?;
        Self::check_response(METHOD, response).await?;
        debug!(chat_id = ctx.chat_id, reply_to = ctx.message_id, "text reply sent");
        Ok(())
    }

    async fn send_photo(&self, ctx: &MessageContext, photo: &Path) -> Result<(), DeliveryError> {
        const METHOD: &str = "sendPhoto";
        let bytes = tokio::fs::read(photo)
            .await
            .map_err(|source| DeliveryError::ReadPhoto {
                path: photo.to_path_buf(),
                source,
            })?;
        let file_name = photo
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("qr.png")
            .to_string();

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/png")
            .map_err(|err| DeliveryError::transport(METHOD, err))?;
        let form = Form::new()
            .text("chat_id", ctx.chat_id.to_string())
            .text("reply_to_message_id", ctx.message_id.to_string())
            .part("photo", part);

        let response = self
            .client
            .post(self.method_url(METHOD))
            .multipart(form)
            .send()
            .await
            .map_err(|err| DeliveryError::transport(METHOD, err))?;
        Self::check_response(METHOD, response).await?;
        debug!(chat_id = ctx.chat_id, reply_to = ctx.message_id, "photo reply sent");
        Ok(())
    }
}
