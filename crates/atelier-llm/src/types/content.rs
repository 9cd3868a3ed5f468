use serde::{Deserialize, Serialize};

/// Content carried by a single conversational turn.
///
/// A pure-text turn stays a bare string, both in memory and in the
/// persisted record. A turn with attached images becomes an ordered list
/// of parts, text first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// Simple text content
    Text(String),

    /// Multipart content (text followed by image references)
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },

    /// Reference into the content store. The bytes live elsewhere; the
    /// part only carries the derived filename and the user-facing name.
    Image {
        filename: String,
        original_name: String,
    },
}

/// A stored attachment reference, as produced by upload intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAttachment {
    pub filename: String,
    pub original_name: String,
}

/// One instruction for a display collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItem {
    Text(String),
    Image { filename: String, original_name: String },
}

impl Content {
    /// Create text content
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Combine a prompt with uploaded images.
    ///
    /// An empty image list collapses to the plain-text form; otherwise the
    /// text part comes first and image parts keep their upload order.
    pub fn mixed(text: impl Into<String>, images: Vec<ImageAttachment>) -> Self {
        let text = text.into();
        if images.is_empty() {
            return Self::Text(text);
        }

        let mut parts = Vec::with_capacity(images.len() + 1);
        parts.push(ContentPart::Text { text });
        parts.extend(images.into_iter().map(|image| ContentPart::Image {
            filename: image.filename,
            original_name: image.original_name,
        }));
        Self::Parts(parts)
    }

    /// Get as plain text (if possible)
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Parts(parts) => {
                if parts.len() == 1 {
                    if let ContentPart::Text { text } = &parts[0] {
                        return Some(text);
                    }
                }
                None
            }
        }
    }

    /// Filenames of every referenced image, in order.
    pub fn image_filenames(&self) -> Vec<&str> {
        match self {
            Self::Text(_) => Vec::new(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Image { filename, .. } => Some(filename.as_str()),
                    ContentPart::Text { .. } => None,
                })
                .collect(),
        }
    }

    /// Ordered display instructions for a rendering surface. Infallible:
    /// whether a referenced image still exists is the renderer's concern.
    pub fn render(&self) -> Vec<DisplayItem> {
        match self {
            Self::Text(text) => vec![DisplayItem::Text(text.clone())],
            Self::Parts(parts) => parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => DisplayItem::Text(text.clone()),
                    ContentPart::Image {
                        filename,
                        original_name,
                    } => DisplayItem::Image {
                        filename: filename.clone(),
                        original_name: original_name.clone(),
                    },
                })
                .collect(),
        }
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}
