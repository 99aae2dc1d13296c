//! Fluent builder for a single outbound message.

use base64::Engine as _;
use std::sync::Arc;
use tracing::instrument;

use crate::errors::{PostalError, PostalResult};
use crate::services::MessagesService;
use crate::types::addresses::Addresses;
use crate::types::message::{MailAttachment, MailMessage, FALLBACK_FROM_ADDRESS};
use crate::types::response::MailResult;

/// Accumulates the fields of one message and sends it.
///
/// Every setter takes `&mut self` and returns `PostalResult<&mut Self>`, so
/// calls chain with `?`. After a successful [`send`](Self::send) the request
/// is closed and every further call fails with
/// [`PostalError::ClosedRequest`]; start a new chain from the client instead.
///
/// ```rust,no_run
/// use integrations_postal::PostalClient;
///
/// # async fn run() -> Result<(), integrations_postal::PostalError> {
/// let client = PostalClient::new("postal.example.com", "server-api-key")?;
///
/// let mut request = client.to(["alice@example.com", "bob@example.com"]);
/// request
///     .from("noreply@example.com")?
///     .subject("Welcome")?
///     .plain_body("Hello!")?;
///
/// let result = request.send().await?;
/// println!("sent {}", result.id);
/// # Ok(())
/// # }
/// ```
pub struct SendMessageRequest {
    service: Arc<MessagesService>,
    closed: bool,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    attachments: Vec<MailAttachment>,
    reply_to: Option<String>,
    from: Option<String>,
    sender: Option<String>,
    tag: Option<String>,
    plain_body: Option<String>,
    html_body: Option<String>,
    subject: Option<String>,
}

impl SendMessageRequest {
    /// Creates an empty request bound to a messages service.
    pub fn new(service: Arc<MessagesService>) -> Self {
        Self {
            service,
            closed: false,
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            attachments: Vec::new(),
            reply_to: None,
            from: None,
            sender: None,
            tag: None,
            plain_body: None,
            html_body: None,
            subject: None,
        }
    }

    /// Returns true once the request has been sent successfully.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self, operation: &'static str) -> PostalResult<()> {
        if self.closed {
            return Err(PostalError::closed(operation));
        }
        Ok(())
    }

    /// Appends primary recipients.
    pub fn to(&mut self, addresses: impl Into<Addresses>) -> PostalResult<&mut Self> {
        self.ensure_open("to")?;
        self.to.extend(addresses.into().flatten());
        Ok(self)
    }

    /// Appends carbon-copy recipients.
    pub fn cc(&mut self, addresses: impl Into<Addresses>) -> PostalResult<&mut Self> {
        self.ensure_open("cc")?;
        self.cc.extend(addresses.into().flatten());
        Ok(self)
    }

    /// Appends blind carbon-copy recipients.
    pub fn bcc(&mut self, addresses: impl Into<Addresses>) -> PostalResult<&mut Self> {
        self.ensure_open("bcc")?;
        self.bcc.extend(addresses.into().flatten());
        Ok(self)
    }

    /// Sets the from address.
    pub fn from(&mut self, address: impl Into<String>) -> PostalResult<&mut Self> {
        self.ensure_open("from")?;
        self.from = Some(address.into());
        Ok(self)
    }

    /// Sets the sender address.
    pub fn sender(&mut self, address: impl Into<String>) -> PostalResult<&mut Self> {
        self.ensure_open("sender")?;
        self.sender = Some(address.into());
        Ok(self)
    }

    /// Sets the subject.
    pub fn subject(&mut self, text: impl Into<String>) -> PostalResult<&mut Self> {
        self.ensure_open("subject")?;
        self.subject = Some(text.into());
        Ok(self)
    }

    /// Sets the Postal tag.
    pub fn tag(&mut self, text: impl Into<String>) -> PostalResult<&mut Self> {
        self.ensure_open("tag")?;
        self.tag = Some(text.into());
        Ok(self)
    }

    /// Sets the Reply-To address.
    pub fn reply_to(&mut self, address: impl Into<String>) -> PostalResult<&mut Self> {
        self.ensure_open("reply_to")?;
        self.reply_to = Some(address.into());
        Ok(self)
    }

    /// Sets the plain text body.
    pub fn plain_body(&mut self, body: impl Into<String>) -> PostalResult<&mut Self> {
        self.ensure_open("plain_body")?;
        self.plain_body = Some(body.into());
        Ok(self)
    }

    /// Sets the HTML body.
    pub fn html_body(&mut self, body: impl Into<String>) -> PostalResult<&mut Self> {
        self.ensure_open("html_body")?;
        self.html_body = Some(body.into());
        Ok(self)
    }

    /// Appends an attachment whose content is already base64 encoded.
    pub fn attachment(
        &mut self,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        base64_data: impl Into<String>,
    ) -> PostalResult<&mut Self> {
        self.ensure_open("attachment")?;
        self.attachments
            .push(MailAttachment::new(filename, content_type, base64_data));
        Ok(self)
    }

    /// Appends an attachment from raw bytes, encoding them as base64.
    pub fn attachment_bytes(
        &mut self,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: &[u8],
    ) -> PostalResult<&mut Self> {
        self.ensure_open("attachment_bytes")?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        self.attachments
            .push(MailAttachment::new(filename, content_type, encoded));
        Ok(self)
    }

    /// Validates the accumulated fields and returns the wire record.
    ///
    /// Checks run in a fixed order: sender, then body, then subject.
    pub fn message(&self) -> PostalResult<MailMessage> {
        self.ensure_open("message")?;

        if self.from.is_none() && self.sender.is_none() {
            return Err(PostalError::MissingSender);
        }
        if self.plain_body.is_none() && self.html_body.is_none() {
            return Err(PostalError::MissingBody);
        }
        let subject = self.subject.clone().ok_or(PostalError::MissingSubject)?;

        let from = self
            .from
            .clone()
            .or_else(|| self.sender.clone())
            .unwrap_or_else(|| FALLBACK_FROM_ADDRESS.to_string());

        Ok(MailMessage {
            to: self.to.clone(),
            cc: self.cc.clone(),
            bcc: self.bcc.clone(),
            from,
            sender: self.sender.clone(),
            subject,
            tag: self.tag.clone(),
            reply_to: self.reply_to.clone(),
            plain_body: self.plain_body.clone(),
            html_body: self.html_body.clone(),
            attachments: self.attachments.clone(),
        })
    }

    /// Sends the message.
    ///
    /// On success the request is closed. A remote error or transport failure
    /// leaves it open so the same request can be sent again.
    #[instrument(skip(self), fields(request_id = %uuid::Uuid::new_v4()))]
    pub async fn send(&mut self) -> PostalResult<MailResult> {
        self.ensure_open("send")?;
        let message = self.message()?;
        let envelope = self.service.perform_request(&message).await?;

        match envelope.into_mail_result() {
            Ok(result) => {
                self.closed = true;
                tracing::info!(
                    message_id = %result.id,
                    recipients = result.messages.len(),
                    "Message accepted"
                );
                Ok(result)
            }
            Err(error) => {
                if let PostalError::Remote { code, .. } = &error {
                    tracing::warn!(%code, "Postal rejected message");
                }
                Err(error)
            }
        }
    }
}

impl std::fmt::Debug for SendMessageRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendMessageRequest")
            .field("closed", &self.closed)
            .field("to", &self.to)
            .field("cc", &self.cc)
            .field("bcc", &self.bcc)
            .field("from", &self.from)
            .field("sender", &self.sender)
            .field("subject", &self.subject)
            .field("attachments", &self.attachments.len())
            .finish_non_exhaustive()
    }
}
