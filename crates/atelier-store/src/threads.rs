use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::fs;
use uuid::Uuid;

use atelier_llm::Message;

use crate::config::StorageConfig;
use crate::content::ContentStore;
use crate::error::{Result, StoreError};
use crate::models::Thread;

/// Durable conversation records, one JSON file per thread.
///
/// A single session writes to a given thread at a time; persistence is
/// whole-file replacement through a temporary sibling, so concurrent
/// readers never see a torn record.
#[derive(Debug, Clone)]
pub struct ThreadStore {
    dir: PathBuf,
    content: Arc<ContentStore>,
    empty_ttl: Duration,
}

impl ThreadStore {
    pub fn new(config: &StorageConfig, content: Arc<ContentStore>) -> Self {
        Self {
            dir: config.threads_dir(),
            content,
            empty_ttl: Duration::seconds(config.empty_thread_ttl_secs as i64),
        }
    }

    /// Create a new thread
    ///
    /// The empty record is persisted immediately so the id is durable
    /// and shows up in listings before the first message arrives.
    pub async fn create(&self) -> Result<Thread> {
        let thread = Thread::new();
        self.save(&thread).await?;
        Ok(thread)
    }

    /// Get thread by ID
    pub async fn get(&self, id: Uuid) -> Result<Thread> {
        let bytes = match fs::read(self.record_path(id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::ThreadNotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Append one message, refresh `last_updated`, persist the whole
    /// record. Returns the updated thread.
    pub async fn append(&self, id: Uuid, message: Message) -> Result<Thread> {
        let mut thread = self.get(id).await?;
        thread.messages.push(message);
        thread.last_updated = Utc::now();
        self.save(&thread).await?;
        Ok(thread)
    }

    /// List all threads, most recently updated first.
    ///
    /// Not side-effect-free: runs `sweep` first, so abandoned empty
    /// threads never reach the caller.
    pub async fn list(&self) -> Result<Vec<Thread>> {
        self.sweep().await?;

        let mut threads = Vec::new();

        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(threads),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            match read_record(&path).await {
                Ok(thread) => threads.push(thread),
                Err(e) => {
                    tracing::warn!("Skipping unreadable thread record {}: {}", path.display(), e);
                }
            }
        }

        threads.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        Ok(threads)
    }

    /// Evict empty threads whose last activity is older than the TTL.
    ///
    /// Threads created but abandoned before the first message would
    /// otherwise accumulate forever.
    pub async fn sweep(&self) -> Result<usize> {
        let now = Utc::now();
        let mut evicted = 0;

        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let thread = match read_record(&path).await {
                Ok(thread) => thread,
                // Corrupt records are a listing concern, not a sweep one
                Err(_) => continue,
            };

            if thread.is_empty() && now - thread.last_updated > self.empty_ttl {
                match fs::remove_file(&path).await {
                    Ok(()) => evicted += 1,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }

        if evicted > 0 {
            tracing::info!("Swept {} abandoned empty thread(s)", evicted);
        }
        Ok(evicted)
    }

    /// Delete a thread and every attachment scoped to it.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.content.delete_namespace(&id.to_string()).await?;

        match fs::remove_file(self.record_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, thread: &Thread) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;

        let json = serde_json::to_vec_pretty(thread)?;
        let staging = self.dir.join(format!(".{}.tmp", thread.id));
        fs::write(&staging, &json).await?;
        fs::rename(&staging, self.record_path(thread.id)).await?;

        Ok(())
    }

    fn record_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

async fn read_record(path: &Path) -> Result<Thread> {
    let bytes = fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
