//! Response envelope returned by the send-message endpoint and the result
//! handed back to callers.

use serde::{Deserialize, Serialize};

use crate::errors::{PostalError, PostalResult};

/// Status field of a response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The message was accepted.
    Success,
    /// The server rejected the request.
    Error,
}

/// Parsed JSON response from Postal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Whether the request succeeded.
    pub status: ResponseStatus,
    /// Server-side processing time.
    #[serde(default)]
    pub time: f64,
    /// Opaque flags object.
    #[serde(default)]
    pub flags: serde_json::Value,
    /// Status specific payload.
    pub data: ResponseData,
}

/// Payload of a response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    /// Payload of a success envelope.
    Success(SuccessPayload),
    /// Payload of an error envelope.
    Error(ErrorPayload),
}

/// Error details reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Machine readable error code.
    pub code: String,
    /// Human readable description.
    #[serde(default)]
    pub message: String,
}

/// Details of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessPayload {
    /// Identifier of the message as a whole.
    pub message_id: String,
    /// Per-recipient receipts keyed by address, in server order.
    #[serde(with = "ordered_receipts")]
    pub messages: Vec<(String, MessageReceipt)>,
}

/// Per-recipient identifiers assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReceipt {
    /// Numeric message id for this recipient.
    pub id: u64,
    /// Token for this recipient's copy.
    pub token: String,
}

/// Result of a successful send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailResult {
    /// Identifier of the message as a whole.
    pub id: String,
    /// Server-side processing time.
    pub time: f64,
    /// Opaque flags object.
    pub flags: serde_json::Value,
    /// One entry per recipient, in server order.
    pub messages: Vec<MailResultMessage>,
}

/// A recipient entry of a [`MailResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailResultMessage {
    /// Recipient address.
    pub address: String,
    /// Numeric message id for this recipient.
    pub id: u64,
    /// Token for this recipient's copy.
    pub token: String,
}

impl MailResult {
    /// Looks up the entry for a recipient address.
    pub fn message_for(&self, address: &str) -> Option<&MailResultMessage> {
        self.messages.iter().find(|m| m.address == address)
    }
}

impl ResponseEnvelope {
    /// Interprets the envelope as a [`MailResult`] or a remote error.
    ///
    /// A status that disagrees with the payload shape is reported as a
    /// serialization error.
    pub fn into_mail_result(self) -> PostalResult<MailResult> {
        match (self.status, self.data) {
            (ResponseStatus::Success, ResponseData::Success(payload)) => Ok(MailResult {
                id: payload.message_id,
                time: self.time,
                flags: self.flags,
                messages: payload
                    .messages
                    .into_iter()
                    .map(|(address, receipt)| MailResultMessage {
                        address,
                        id: receipt.id,
                        token: receipt.token,
                    })
                    .collect(),
            }),
            (ResponseStatus::Error, ResponseData::Error(payload)) => Err(PostalError::Remote {
                code: payload.code,
                message: payload.message,
            }),
            (status, _) => Err(PostalError::Serialization {
                message: format!("Response data does not match status {:?}", status),
            }),
        }
    }
}

/// (De)serializes the address map as an ordered list of pairs.
mod ordered_receipts {
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    use super::MessageReceipt;

    pub fn serialize<S: Serializer>(
        entries: &[(String, MessageReceipt)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (address, receipt) in entries {
            map.serialize_entry(address, receipt)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, MessageReceipt)>, D::Error> {
        struct ReceiptsVisitor;

        impl<'de> Visitor<'de> for ReceiptsVisitor {
            type Value = Vec<(String, MessageReceipt)>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of recipient address to message receipt")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry()? {
                    entries.push(entry);
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(ReceiptsVisitor)
    }
}
