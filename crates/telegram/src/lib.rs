//! Telegram plumbing for qrbot: decoding webhook updates into a
//! [`MessageContext`] and replying through the Bot API.
//!
//! The [`ReplySender`] trait is the seam the rest of the workspace talks to;
//! [`BotApi`] is the real implementation.

mod client;
mod envelope;
mod error;

pub use crate::client::{BotApi, BotApiConfig, ReplySender, DEFAULT_API_URL};
pub use crate::envelope::{decode_update, Chat, Message, MessageContext, Update};
pub use crate::error::{DeliveryError, EnvelopeError};
