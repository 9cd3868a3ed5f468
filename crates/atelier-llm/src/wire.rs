// Conversion of stored message content into the completion API shape

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::types::{Content, ContentPart, Message};

/// One role-tagged entry of the outbound request payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: WireContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireContent {
    Text(String),
    Parts(Vec<WirePart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WirePart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Convert stored content to the wire shape.
///
/// `resolve` maps an attachment filename to its bytes. Plain text passes
/// through unchanged; each image reference is inlined as a base64 data
/// URL. An image whose bytes cannot be resolved is dropped rather than
/// failing the whole turn.
pub fn to_wire<F>(content: &Content, resolve: F) -> WireContent
where
    F: Fn(&str) -> Option<Vec<u8>>,
{
    match content {
        Content::Text(text) => WireContent::Text(text.clone()),
        Content::Parts(parts) => {
            let mut wired = Vec::with_capacity(parts.len());
            for part in parts {
                match part {
                    ContentPart::Text { text } => {
                        wired.push(WirePart::Text { text: text.clone() });
                    }
                    ContentPart::Image { filename, .. } => match resolve(filename) {
                        Some(bytes) => wired.push(WirePart::ImageUrl {
                            image_url: ImageUrl {
                                url: data_url(filename, &bytes),
                            },
                        }),
                        None => {
                            tracing::warn!("Dropping missing attachment from request: {}", filename);
                        }
                    },
                }
            }
            WireContent::Parts(wired)
        }
    }
}

/// Convert a whole message, pairing its role with wired content.
pub fn message_to_wire<F>(message: &Message, resolve: F) -> WireMessage
where
    F: Fn(&str) -> Option<Vec<u8>>,
{
    WireMessage {
        role: message.role().to_string(),
        content: to_wire(message.content(), resolve),
    }
}

fn data_url(filename: &str, bytes: &[u8]) -> String {
    let mime = match filename.rsplit('.').next() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    };
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

impl WireContent {
    /// Number of items carried on the wire (1 for plain text).
    pub fn len(&self) -> usize {
        match self {
            Self::Text(_) => 1,
            Self::Parts(parts) => parts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Parts(parts) if parts.is_empty())
    }
}
