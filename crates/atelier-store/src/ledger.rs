use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::Result;
use crate::models::{GenerationRecord, InpaintingRecord};

/// Append-only history of image-generation batches and inpainting edits.
///
/// Each entry is one metadata record plus an id-named folder of raw
/// artifacts beside it. Entries are independent of any conversation
/// thread.
#[derive(Debug, Clone)]
pub struct GenerationLedger {
    generated_dir: PathBuf,
    inpainting_dir: PathBuf,
}

impl GenerationLedger {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            generated_dir: config.generated_images_dir(),
            inpainting_dir: config.inpainting_images_dir(),
        }
    }

    /// Persist one batch of generated artifacts with its metadata.
    ///
    /// The record's path list and the artifact folder agree in count and
    /// order by construction.
    pub async fn record_generation(
        &self,
        prompt: &str,
        artifacts: &[Vec<u8>],
    ) -> Result<GenerationRecord> {
        let id = Uuid::new_v4();
        let folder = self.generated_dir.join(id.to_string());
        fs::create_dir_all(&folder).await?;

        let mut image_paths = Vec::with_capacity(artifacts.len());
        for (index, bytes) in artifacts.iter().enumerate() {
            let path = folder.join(format!("{}.png", index));
            fs::write(&path, bytes).await?;
            image_paths.push(path);
        }

        let record = GenerationRecord {
            id,
            prompt: prompt.to_string(),
            image_paths,
            timestamp: Utc::now(),
        };
        write_metadata(&self.generated_dir, id, &record).await?;
        Ok(record)
    }

    /// Persist one inpainting edit: the untouched original next to the
    /// edited result.
    pub async fn record_inpainting(
        &self,
        prompt: &str,
        original: &[u8],
        edited: &[u8],
    ) -> Result<InpaintingRecord> {
        let id = Uuid::new_v4();
        let folder = self.inpainting_dir.join(id.to_string());
        fs::create_dir_all(&folder).await?;

        let original_image_path = folder.join("original.png");
        fs::write(&original_image_path, original).await?;

        let inpainted_image_path = folder.join("inpainted.png");
        fs::write(&inpainted_image_path, edited).await?;

        let record = InpaintingRecord {
            id,
            prompt: prompt.to_string(),
            original_image_path,
            inpainted_image_path,
            timestamp: Utc::now(),
        };
        write_metadata(&self.inpainting_dir, id, &record).await?;
        Ok(record)
    }

    /// List generation batches, newest first.
    pub async fn list_generations(&self) -> Result<Vec<GenerationRecord>> {
        let mut records: Vec<GenerationRecord> = list_records(&self.generated_dir).await?;
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    /// List inpainting edits, newest first.
    pub async fn list_inpaintings(&self) -> Result<Vec<InpaintingRecord>> {
        let mut records: Vec<InpaintingRecord> = list_records(&self.inpainting_dir).await?;
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    /// Remove a generation batch and its artifact folder. Idempotent.
    pub async fn delete_generation(&self, id: Uuid) -> Result<()> {
        delete_record(&self.generated_dir, id).await
    }

    /// Remove an inpainting entry and its artifact folder. Idempotent.
    pub async fn delete_inpainting(&self, id: Uuid) -> Result<()> {
        delete_record(&self.inpainting_dir, id).await
    }
}

async fn write_metadata<T: Serialize>(dir: &Path, id: Uuid, record: &T) -> Result<()> {
    fs::create_dir_all(dir).await?;

    let json = serde_json::to_vec_pretty(record)?;
    let staging = dir.join(format!(".{}.tmp", id));
    fs::write(&staging, &json).await?;
    fs::rename(&staging, dir.join(format!("{}.json", id))).await?;

    Ok(())
}

async fn list_records<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut records = Vec::new();

    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(records),
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }

        let bytes = fs::read(&path).await?;
        match serde_json::from_slice(&bytes) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Skipping unreadable ledger record {}: {}", path.display(), e);
            }
        }
    }

    Ok(records)
}

async fn delete_record(dir: &Path, id: Uuid) -> Result<()> {
    match fs::remove_file(dir.join(format!("{}.json", id))).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    match fs::remove_dir_all(dir.join(id.to_string())).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
