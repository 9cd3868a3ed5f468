use std::pin::Pin;

use anyhow::Result;
use async_trait::async_trait;
use futures::Stream;

use crate::streaming::StreamEvent;
use crate::wire::WireMessage;

/// A finite stream of completion events.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

/// Trait for streaming chat interactions
///
/// One request is one round-trip; a failed or abandoned stream is retried
/// by issuing a new request, never by resuming.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Streaming chat completion
    async fn chat_stream(&self, request: ChatRequest) -> Result<ChatStream>;
}

/// Trait for image generation and editing
#[async_trait]
pub trait ImageClient: Send + Sync {
    /// Generate one image for `prompt`, returning its bytes.
    async fn generate_image(&self, prompt: &str, options: &ImageOptions) -> Result<Vec<u8>>;

    /// Regenerate the masked region of `image`, returning the edited
    /// bytes. The mask must match the image dimensions and be two-tone.
    async fn edit_image(
        &self,
        image: &[u8],
        mask: &[u8],
        prompt: &str,
        options: &ImageOptions,
    ) -> Result<Vec<u8>>;
}

/// Convenience trait for clients that support both surfaces
pub trait LLMClient: ChatClient + ImageClient {}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub options: ChatOptions,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<WireMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: ChatOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ChatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ImageOptions {
    pub model: String,
    pub size: String,
    pub quality: String,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            model: "dall-e-3".to_string(),
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
        }
    }
}

impl ImageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    pub fn quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = quality.into();
        self
    }
}
