use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Metadata for one batch of generated images.
///
/// Immutable once written; `image_paths` lists the artifacts of the
/// batch in request order, one path per requested image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub id: Uuid,
    pub prompt: String,
    pub image_paths: Vec<PathBuf>,
    pub timestamp: DateTime<Utc>,
}

/// Metadata for one inpainting edit: exactly one original and one
/// edited artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InpaintingRecord {
    pub id: Uuid,
    pub prompt: String,
    pub original_image_path: PathBuf,
    pub inpainted_image_path: PathBuf,
    pub timestamp: DateTime<Utc>,
}
