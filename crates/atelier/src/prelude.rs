//! Prelude module for convenient imports
//!
//! Import everything you need with:
//! ```rust
//! use atelier::prelude::*;
//! ```

pub use crate::{
    ChatClient, ImageClient, LLMClient, OpenAIClient,
    ChatRequest, ChatOptions, ChatStream, ImageOptions,
    Content, ContentPart, DisplayItem, ImageAttachment, Message, StreamEvent,
    StoreClient, ContentStore, ThreadStore, GenerationLedger,
    Thread, GenerationRecord, InpaintingRecord,
    ExportFormat, export_thread,
    StorageConfig, StoreError,
    Session, Config, LlmConfig, BehaviorMode, ModifierSet, PdfTextExtractor, Upload,
};
