use std::sync::Arc;

use anyhow::{Context, Result};
use uuid::Uuid;

use atelier_llm::{
    collect_text, ChatClient, ChatOptions, ChatRequest, ChatStream, ImageClient, ImageOptions,
    Message,
};
use atelier_store::{GenerationRecord, InpaintingRecord, StoreClient, Thread};

use crate::assembler::{build_request, generate_batch};
use crate::config::LlmConfig;
use crate::intake::{process_uploads, PdfTextExtractor, Upload};
use crate::modes::{BehaviorMode, ModifierSet};

/// Explicit per-interaction state: the selected thread, the active
/// behavior mode, and handles to the stores and clients.
///
/// Every operation takes its context from here rather than from ambient
/// globals, so independent sessions can coexist over the same stores.
pub struct Session {
    store: Arc<StoreClient>,
    chat: Arc<dyn ChatClient>,
    images: Arc<dyn ImageClient>,
    llm: LlmConfig,
    pub mode: BehaviorMode,
    current_thread: Option<Uuid>,
}

impl Session {
    pub fn new(
        store: Arc<StoreClient>,
        chat: Arc<dyn ChatClient>,
        images: Arc<dyn ImageClient>,
        llm: LlmConfig,
    ) -> Self {
        Self {
            store,
            chat,
            images,
            llm,
            mode: BehaviorMode::passthrough(),
            current_thread: None,
        }
    }

    pub fn store(&self) -> &StoreClient {
        &self.store
    }

    pub fn current_thread(&self) -> Option<Uuid> {
        self.current_thread
    }

    pub fn select_thread(&mut self, id: Uuid) {
        self.current_thread = Some(id);
    }

    pub fn select_mode(&mut self, mode: BehaviorMode) {
        self.mode = mode;
    }

    /// The selected thread, or a fresh one when nothing is selected or
    /// the selection no longer exists.
    pub async fn ensure_thread(&mut self) -> Result<Thread> {
        if let Some(id) = self.current_thread {
            if let Ok(thread) = self.store.threads().get(id).await {
                return Ok(thread);
            }
        }

        let thread = self.store.threads().create().await?;
        self.current_thread = Some(thread.id);
        Ok(thread)
    }

    /// Run the user's side of a chat turn and open the reply stream.
    ///
    /// The user message (with processed attachments) is persisted before
    /// dispatch. The assistant's reply is persisted separately via
    /// `record_reply` once the stream is fully consumed, so an abandoned
    /// or cancelled stream leaves the thread with the user turn only.
    pub async fn send_message(
        &mut self,
        prompt: &str,
        uploads: &[Upload],
        pdf: Option<&dyn PdfTextExtractor>,
    ) -> Result<ChatStream> {
        let thread = self.ensure_thread().await?;
        let namespace = thread.id.to_string();

        let content =
            process_uploads(prompt, uploads, &namespace, self.store.content(), pdf).await?;
        let thread = self
            .store
            .threads()
            .append(thread.id, Message::user(content))
            .await?;

        let wire = build_request(&thread, &self.mode, self.store.content()).await;

        let mut options = ChatOptions::new();
        if let Some(temperature) = self.llm.temperature {
            options = options.temperature(temperature);
        }
        let request = ChatRequest::new(self.llm.chat_model.clone(), wire).with_options(options);

        self.chat.chat_stream(request).await
    }

    /// Persist the assembled assistant reply as the next turn.
    pub async fn record_reply(&self, text: impl Into<String>) -> Result<Thread> {
        let id = self.current_thread.context("No thread selected")?;
        Ok(self
            .store
            .threads()
            .append(id, Message::assistant(text.into()))
            .await?)
    }

    /// Convenience: run a whole chat turn, waiting for the complete
    /// reply, then persist it.
    pub async fn run_turn(
        &mut self,
        prompt: &str,
        uploads: &[Upload],
        pdf: Option<&dyn PdfTextExtractor>,
    ) -> Result<Thread> {
        let stream = self.send_message(prompt, uploads, pdf).await?;
        let reply = collect_text(stream).await?;
        self.record_reply(reply).await
    }

    /// Expand the prompt with the selected modifiers, fan out `count`
    /// concurrent generations, and record the batch.
    ///
    /// Nothing reaches the ledger unless every worker succeeds.
    pub async fn generate_images(
        &self,
        prompt: &str,
        modifiers: &ModifierSet,
        count: u32,
    ) -> Result<GenerationRecord> {
        let final_prompt = modifiers.expand(prompt);
        let options = ImageOptions::new().model(self.llm.image_model.clone());

        let artifacts =
            generate_batch(self.images.as_ref(), &final_prompt, count, &options).await?;

        Ok(self
            .store
            .ledger()
            .record_generation(&final_prompt, &artifacts)
            .await?)
    }

    /// One image-edit call, recorded on success.
    pub async fn inpaint(
        &self,
        original: &[u8],
        mask: &[u8],
        prompt: &str,
    ) -> Result<InpaintingRecord> {
        let options = ImageOptions::new().model(self.llm.edit_model.clone());
        let edited = self.images.edit_image(original, mask, prompt, &options).await?;

        Ok(self
            .store
            .ledger()
            .record_inpainting(prompt, original, &edited)
            .await?)
    }
}
