//! The wire record submitted to the send-message endpoint.

use serde::{Deserialize, Serialize};

/// Address used as `from` when only validation would otherwise stop the send.
///
/// The builder rejects requests with neither `from` nor `sender` before this
/// value can be chosen, so it never reaches the wire from this crate.
pub const FALLBACK_FROM_ADDRESS: &str = "sender@in.valid";

/// A validated message ready to be posted.
///
/// Produced by [`SendMessageRequest::message`](crate::SendMessageRequest::message).
/// Unset optional fields are left out of the JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    /// Primary recipients.
    #[serde(default)]
    pub to: Vec<String>,
    /// Carbon-copy recipients.
    #[serde(default)]
    pub cc: Vec<String>,
    /// Blind carbon-copy recipients.
    #[serde(default)]
    pub bcc: Vec<String>,
    /// Resolved from address.
    pub from: String,
    /// Sender address, if distinct from `from`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    /// Subject line.
    pub subject: String,
    /// Postal tag used for filtering and statistics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Reply-To address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    /// Plain text body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_body: Option<String>,
    /// HTML body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_body: Option<String>,
    /// Attachments, in the order they were added.
    #[serde(default)]
    pub attachments: Vec<MailAttachment>,
}

/// A file attached to a message, already base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailAttachment {
    /// MIME type, e.g. `application/pdf`.
    pub content_type: String,
    /// File name shown to the recipient.
    pub filename: String,
    /// Base64 encoded content.
    pub base64_data: String,
}

impl MailAttachment {
    /// Creates an attachment from already encoded data.
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        base64_data: impl Into<String>,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            filename: filename.into(),
            base64_data: base64_data.into(),
        }
    }
}
