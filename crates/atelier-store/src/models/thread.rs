use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atelier_llm::{Content, Message};

/// One durable conversation record.
///
/// `last_updated` moves forward on every append; the message list is
/// append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: Uuid,
    pub last_updated: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl Thread {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            last_updated: Utc::now(),
            messages: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Listing excerpt: the first turn's text, or a marker for
    /// image-first and empty threads.
    pub fn preview(&self) -> String {
        match self.messages.first() {
            None => "Empty thread".to_string(),
            Some(message) => match message.content() {
                Content::Text(text) => {
                    let excerpt: String = text.chars().take(30).collect();
                    format!("{}...", excerpt)
                }
                Content::Parts(_) => "Image thread".to_string(),
            },
        }
    }
}

impl Default for Thread {
    fn default() -> Self {
        Self::new()
    }
}
