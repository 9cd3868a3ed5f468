use serde::Deserialize;
use std::path::PathBuf;

/// Where the stores keep their records, and how long an empty thread may
/// sit idle before the sweep evicts it.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all persisted state
    pub data_dir: PathBuf,

    /// Seconds an empty thread survives before eviction
    #[serde(default = "default_empty_thread_ttl")]
    pub empty_thread_ttl_secs: u64,
}

fn default_empty_thread_ttl() -> u64 {
    120
}

impl StorageConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            empty_thread_ttl_secs: default_empty_thread_ttl(),
        }
    }

    pub fn threads_dir(&self) -> PathBuf {
        self.data_dir.join("thread_history")
    }

    pub fn uploaded_images_dir(&self) -> PathBuf {
        self.data_dir.join("uploaded_images")
    }

    pub fn generated_images_dir(&self) -> PathBuf {
        self.data_dir.join("generated_images")
    }

    pub fn inpainting_images_dir(&self) -> PathBuf {
        self.data_dir.join("inpainting_images")
    }
}
