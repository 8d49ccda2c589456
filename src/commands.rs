//! Slash-command replies.

pub const COMMAND_PREFIX: char = '/';

pub const HELP_RESPONSE: &str = "To make QR core, just send URL to the chat";
pub const INVALID_COMMAND_RESPONSE: &str = "Unfortunately, this message is not valid command";

/// Whether the message should be routed to [`dispatch_command`].
pub fn is_command(text: &str) -> bool {
    text.starts_with(COMMAND_PREFIX)
}

/// Map command text to its canned reply.
///
/// `/start` and `/help` get the help text, anything else the invalid-command
/// text. Matching is exact: no arguments, no `@botname` suffix.
pub fn dispatch_command(text: &str) -> &'static str {
    match text {
        "/start" | "/help" => HELP_RESPONSE,
        _ => INVALID_COMMAND_RESPONSE,
    }
}
