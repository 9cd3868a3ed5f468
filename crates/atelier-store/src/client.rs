use std::sync::Arc;

use crate::config::StorageConfig;
use crate::content::ContentStore;
use crate::ledger::GenerationLedger;
use crate::threads::ThreadStore;

/// One handle over the three stores, wired from a single config.
pub struct StoreClient {
    content: Arc<ContentStore>,
    threads: ThreadStore,
    ledger: GenerationLedger,
}

impl StoreClient {
    pub fn new(config: &StorageConfig) -> Self {
        let content = Arc::new(ContentStore::new(config.uploaded_images_dir()));
        let threads = ThreadStore::new(config, Arc::clone(&content));
        let ledger = GenerationLedger::new(config);

        Self {
            content,
            threads,
            ledger,
        }
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    pub fn threads(&self) -> &ThreadStore {
        &self.threads
    }

    pub fn ledger(&self) -> &GenerationLedger {
        &self.ledger
    }
}
