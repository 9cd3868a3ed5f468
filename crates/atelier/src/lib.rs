//! # Atelier
//!
//! The durable core of a chat and image-generation studio: conversation
//! threads with multi-modal turns, content-addressed attachment storage,
//! an image-generation ledger, and the request assembly that feeds an
//! OpenAI-compatible completion API.
//!
//! ## Overview
//!
//! Atelier gives an embedding surface (web page, TUI, anything that can
//! render text and images) everything below the widgets:
//!
//! - **Persist conversations** as independently addressable JSON records
//! - **Store attachments** content-addressed, deduplicated per thread
//! - **Stream replies** as an async event sequence, render-agnostic
//! - **Fan out image batches** concurrently, all-or-nothing
//! - **Export threads** to txt, json, markdown, and csv
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use atelier::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!
//!     let store = Arc::new(StoreClient::new(&config.storage));
//!     let client = Arc::new(OpenAIClient::new(config.openai_api_key.clone())?);
//!
//!     let mut session = Session::new(
//!         store,
//!         client.clone(),
//!         client,
//!         config.llm.clone(),
//!     );
//!
//!     // One chat turn: persist the user message, stream the reply,
//!     // persist it once complete
//!     let mut stream = session.send_message("Hello!", &[], None).await?;
//!     let mut reply = String::new();
//!     while let Some(event) = futures::StreamExt::next(&mut stream).await {
//!         match event? {
//!             StreamEvent::Message { content } => {
//!                 print!("{}", content);
//!                 reply.push_str(&content);
//!             }
//!             StreamEvent::Done { .. } => break,
//!         }
//!     }
//!     session.record_reply(reply).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Atelier is organized into focused crates:
//!
//! - **`atelier-llm`**: message model, wire conversion, streaming client
//! - **`atelier-store`**: file-backed thread, attachment, and ledger stores
//! - **`atelier-session`**: session context, upload intake, request assembly
//!
//! ## License
//!
//! MIT

pub mod prelude;

pub use atelier_llm::{
    ChatClient, ImageClient, LLMClient,
    OpenAIClient,
    ChatRequest, ChatOptions, ChatStream, ImageOptions,
    Content, ContentPart, DisplayItem, ImageAttachment, Message,
    StreamEvent, collect_text,
    WireContent, WireMessage, WirePart,
};

pub use atelier_store::{
    ContentStore, GenerationLedger, StoreClient, ThreadStore,
    GenerationRecord, InpaintingRecord, Thread,
    ExportFormat, export_thread,
    StorageConfig, StoreError,
};

pub use atelier_session::{
    BehaviorMode, Config, LlmConfig, ModifierSet, PdfTextExtractor, Session, Upload,
};
