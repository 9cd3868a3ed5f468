pub mod models;
pub mod content;
pub mod threads;
pub mod ledger;
pub mod export;
pub mod client;
pub mod config;
pub mod error;

pub use client::StoreClient;
pub use config::StorageConfig;
pub use content::ContentStore;
pub use error::StoreError;
pub use export::{export_thread, ExportFormat};
pub use ledger::GenerationLedger;
pub use models::{GenerationRecord, InpaintingRecord, Thread};
pub use threads::ThreadStore;
