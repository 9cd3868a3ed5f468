use anyhow::Result;

use atelier_llm::{Content, ImageAttachment};
use atelier_store::ContentStore;

/// One file handed over by the composer, with the MIME type the
/// uploader reported.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// Black-box PDF text extraction, provided by the embedding surface.
pub trait PdfTextExtractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String>;
}

/// Classify uploads and fold them into one outgoing turn.
///
/// PDFs and readable text files are inlined into the prompt text. Images
/// land in the content store under the thread's namespace and come back
/// as ordered references. A text file that does not decode leaves a
/// placeholder note instead of raw bytes, keeping an audit trail without
/// bloating the prompt.
pub async fn process_uploads(
    prompt: &str,
    uploads: &[Upload],
    namespace: &str,
    content: &ContentStore,
    pdf: Option<&dyn PdfTextExtractor>,
) -> Result<Content> {
    let mut display_text = prompt.to_string();
    let mut images = Vec::new();

    for upload in uploads {
        if upload.mime == "application/pdf" {
            match pdf {
                Some(extractor) => {
                    let text = extractor.extract_text(&upload.bytes)?;
                    display_text
                        .push_str(&format!("\nAttached PDF file '{}':\n{}", upload.name, text));
                }
                None => {
                    tracing::warn!("No PDF extractor configured, skipping '{}'", upload.name);
                }
            }
        } else if upload.mime.starts_with("image/") {
            let extension = upload.mime.rsplit('/').next().unwrap_or("png");
            let filename = content.put(&upload.bytes, extension, namespace).await?;
            images.push(ImageAttachment {
                filename,
                original_name: upload.name.clone(),
            });
        } else if upload.mime.starts_with("text/") {
            match std::str::from_utf8(&upload.bytes) {
                Ok(decoded) => display_text.push_str(&format!(
                    "\nAttached text file '{}':\n{}",
                    upload.name, decoded
                )),
                Err(_) => display_text.push_str(&format!(
                    "\nAttached binary file '{}':\n[Binary content encoded in base64]",
                    upload.name
                )),
            }
        }
    }

    Ok(Content::mixed(display_text, images))
}
