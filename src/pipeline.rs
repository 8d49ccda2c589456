use std::path::Path;
use std::sync::Arc;

use linkcheck::{AcceptedUrl, Probe, SchemePolicy, UrlRejection, extract_url};
use qrimage::{QrConfig, QrImage, render_to_tempfile};
use telegram::{MessageContext, ReplySender};
use tracing::{info, warn};

use crate::commands::{dispatch_command, is_command};
use crate::{MetricsSpan, PipelineError, ReplyKind};

pub const INVALID_URL_RESPONSE: &str = "Unfortunately, this message is not valid URL";

/// How a message was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A slash command got its canned reply.
    Command { response: &'static str },
    /// The text was not a usable URL; the user got [`INVALID_URL_RESPONSE`].
    Rejected(UrlRejection),
    /// A QR code for this URL was sent as a photo.
    QrSent(AcceptedUrl),
}

/// Routes one message to a command reply or a QR reply.
///
/// Holds no per-request state: one instance serves every request.
#[derive(Clone)]
pub struct Pipeline {
    policy: SchemePolicy,
    qr: QrConfig,
    probe: Arc<dyn Probe>,
    sender: Arc<dyn ReplySender>,
}

impl Pipeline {
    pub fn new(probe: Arc<dyn Probe>, sender: Arc<dyn ReplySender>, qr: QrConfig) -> Self {
        Self {
            policy: SchemePolicy::default(),
            qr,
            probe,
            sender,
        }
    }

    pub fn with_policy(mut self, policy: SchemePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Answer `ctx`.
    ///
    /// Every QR temp file is gone by the time this returns, whether the photo
    /// was delivered or not.
    pub async fn handle(&self, ctx: &MessageContext) -> Result<Outcome, PipelineError> {
        if is_command(&ctx.text) {
            let response = dispatch_command(&ctx.text);
            self.send_text(ctx, response).await?;
            return Ok(Outcome::Command { response });
        }

        let span = MetricsSpan::start();
        let normalized = extract_url(&ctx.text, &self.policy, self.probe.as_ref()).await;
        if let Some(span) = span {
            span.record_normalize(normalized.as_ref().map(|_| ()));
        }

        let accepted = match normalized {
            Ok(accepted) => accepted,
            Err(rejection) => {
                info!(chat_id = ctx.chat_id, %rejection, "message is not a usable URL");
                self.send_text(ctx, INVALID_URL_RESPONSE).await?;
                return Ok(Outcome::Rejected(rejection));
            }
        };

        let image = self.render(&accepted).await?;
        let sent = self.send_photo(ctx, image.path()).await;
        let path = image.path().to_path_buf();
        if let Err(err) = image.close() {
            warn!(path = %path.display(), error = %err, "failed to remove qr image");
        }
        sent?;

        info!(chat_id = ctx.chat_id, url = %accepted, "qr code sent");
        Ok(Outcome::QrSent(accepted))
    }

    async fn render(&self, url: &AcceptedUrl) -> Result<QrImage, PipelineError> {
        let span = MetricsSpan::start();
        let data = url.as_str().to_owned();
        let cfg = self.qr.clone();

        let result = match tokio::task::spawn_blocking(move || render_to_tempfile(&data, &cfg)).await
        {
            Ok(rendered) => rendered.map_err(PipelineError::from),
            Err(join_err) => Err(PipelineError::RenderTask(join_err.to_string())),
        };
        if let Some(span) = span {
            span.record_render(result.as_ref().map(|_| ()));
        }
        result
    }

    async fn send_text(&self, ctx: &MessageContext, text: &str) -> Result<(), PipelineError> {
        let span = MetricsSpan::start();
        let result = self.sender.send_text(ctx, text).await;
        if let Some(span) = span {
            span.record_delivery(ReplyKind::Text, result.as_ref().map(|_| ()));
        }
        Ok(result?)
    }

    async fn send_photo(&self, ctx: &MessageContext, photo: &Path) -> Result<(), PipelineError> {
        let span = MetricsSpan::start();
        let result = self.sender.send_photo(ctx, photo).await;
        if let Some(span) = span {
            span.record_delivery(ReplyKind::Photo, result.as_ref().map(|_| ()));
        }
        Ok(result?)
    }
}
