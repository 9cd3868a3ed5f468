use std::str::FromStr;

use chrono::Utc;

use atelier_llm::{Content, ContentPart};

use crate::error::{Result, StoreError};
use crate::models::Thread;

/// Downloadable renditions of a thread. All are read-only views; none
/// mutate the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Txt,
    Json,
    Markdown,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Json => "json",
            Self::Markdown => "md",
            Self::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Txt => "text/plain",
            Self::Json => "application/json",
            Self::Markdown => "text/markdown",
            Self::Csv => "text/csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "txt" => Ok(Self::Txt),
            "json" => Ok(Self::Json),
            "md" => Ok(Self::Markdown),
            "csv" => Ok(Self::Csv),
            other => Err(StoreError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Render `thread` in the requested format.
///
/// Returns the document body and a timestamped download filename.
pub fn export_thread(thread: &Thread, format: ExportFormat) -> Result<(String, String)> {
    let filename = format!(
        "chat_export_{}.{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        format.extension()
    );

    let content = match format {
        ExportFormat::Txt => to_txt(thread),
        ExportFormat::Json => serde_json::to_string_pretty(thread)?,
        ExportFormat::Markdown => to_markdown(thread),
        ExportFormat::Csv => to_csv(thread),
    };

    Ok((content, filename))
}

fn to_txt(thread: &Thread) -> String {
    let mut out = String::from("=== Chat Export ===\n");
    out.push_str(&format!(
        "Date: {}\n\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    ));

    for message in &thread.messages {
        out.push_str(&format!("[{}]\n", message.role().to_uppercase()));

        match message.content() {
            Content::Text(text) => out.push_str(&format!("{}\n", text)),
            Content::Parts(parts) => {
                for part in parts {
                    match part {
                        ContentPart::Text { text } => out.push_str(&format!("{}\n", text)),
                        ContentPart::Image { original_name, .. } => {
                            out.push_str(&format!("[Image: {}]\n", original_name))
                        }
                    }
                }
            }
        }

        out.push_str(&format!("\n{}\n\n", "-".repeat(50)));
    }

    out
}

fn to_markdown(thread: &Thread) -> String {
    let mut out = String::from("# Chat Export\n\n");
    out.push_str(&format!(
        "*Generated on: {}*\n\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    ));

    for message in &thread.messages {
        out.push_str(&format!("### {}\n\n", title_case(message.role())));

        match message.content() {
            Content::Text(text) => out.push_str(&format!("{}\n\n", text)),
            Content::Parts(parts) => {
                for part in parts {
                    match part {
                        ContentPart::Text { text } => out.push_str(&format!("{}\n\n", text)),
                        ContentPart::Image { original_name, .. } => {
                            out.push_str(&format!("![{}]\n\n", original_name))
                        }
                    }
                }
            }
        }

        out.push_str("---\n\n");
    }

    out
}

fn to_csv(thread: &Thread) -> String {
    let mut out = String::from("Timestamp,Role,Content\n");

    for message in &thread.messages {
        // Quotes doubled and newlines flattened so each message stays on
        // one row
        let flattened = flatten_content(message.content())
            .replace('"', "\"\"")
            .replace('\n', " ");

        out.push_str(&format!(
            "{},{},\"{}\"\n",
            thread.last_updated.to_rfc3339(),
            message.role(),
            flattened
        ));
    }

    out
}

fn flatten_content(content: &Content) -> String {
    match content {
        Content::Text(text) => text.clone(),
        Content::Parts(parts) => parts
            .iter()
            .map(|part| match part {
                ContentPart::Text { text } => text.clone(),
                ContentPart::Image { original_name, .. } => format!("[Image: {}]", original_name),
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn title_case(role: &str) -> String {
    let mut chars = role.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
