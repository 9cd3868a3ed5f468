// OpenAI-specific client implementation

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;

use crate::streaming::parse_chat_sse_stream;
use crate::traits::{
    ChatClient, ChatOptions, ChatRequest, ChatStream, ImageClient, ImageOptions, LLMClient,
};
use crate::wire::WireMessage;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI client (HTTP direct, no SDK)
pub struct OpenAIClient {
    http_client: reqwest::Client,
    // Artifact locators point at external storage; keep credentials off
    // those requests.
    download_client: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            download_client: reqwest::Client::new(),
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    /// Override the API base URL (gateways, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build chat completion request payload
    fn build_chat_request(
        &self,
        model: &str,
        messages: &[WireMessage],
        options: &ChatOptions,
        stream: bool,
    ) -> Result<Value> {
        let mut request = serde_json::json!({
            "model": model,
            "messages": messages,
            "stream": stream,
        });

        let obj = request.as_object_mut().unwrap();

        if let Some(temp) = options.temperature {
            obj.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = options.max_tokens {
            obj.insert("max_tokens".to_string(), serde_json::json!(max_tokens));
        }

        Ok(request)
    }

    /// Request one generated image, returning its resource locator.
    pub async fn create_image(&self, prompt: &str, options: &ImageOptions) -> Result<String> {
        let payload = serde_json::json!({
            "model": options.model,
            "prompt": prompt,
            "size": options.size,
            "quality": options.quality,
            "n": 1,
        });

        let response = self
            .http_client
            .post(format!("{}/images/generations", self.base_url))
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error ({}): {}", status, error_text);
        }

        let raw: ImagesResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        raw.data
            .into_iter()
            .next()
            .map(|datum| datum.url)
            .ok_or_else(|| anyhow::anyhow!("Image response contained no data"))
    }

    /// Request an edit of `image` under `mask`, returning the locator.
    pub async fn create_image_edit(
        &self,
        image: &[u8],
        mask: &[u8],
        prompt: &str,
        options: &ImageOptions,
    ) -> Result<String> {
        let form = Form::new()
            .text("model", options.model.clone())
            .text("prompt", prompt.to_string())
            .text("size", options.size.clone())
            .part(
                "image",
                Part::bytes(image.to_vec())
                    .file_name("image.png")
                    .mime_str("image/png")?,
            )
            .part(
                "mask",
                Part::bytes(mask.to_vec())
                    .file_name("mask.png")
                    .mime_str("image/png")?,
            );

        let response = self
            .http_client
            .post(format!("{}/images/edits", self.base_url))
            .multipart(form)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error ({}): {}", status, error_text);
        }

        let raw: ImagesResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        raw.data
            .into_iter()
            .next()
            .map(|datum| datum.url)
            .ok_or_else(|| anyhow::anyhow!("Image edit response contained no data"))
    }

    /// Download a generated artifact from its locator.
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .download_client
            .get(url)
            .send()
            .await
            .context("Failed to download image")?;

        if !response.status().is_success() {
            anyhow::bail!("Image download error ({})", response.status());
        }

        Ok(response
            .bytes()
            .await
            .context("Failed to read image bytes")?
            .to_vec())
    }
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    url: String,
}

#[async_trait]
impl ChatClient for OpenAIClient {
    async fn chat_stream(&self, request: ChatRequest) -> Result<ChatStream> {
        let payload =
            self.build_chat_request(&request.model, &request.messages, &request.options, true)?;

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error ({}): {}", status, error_text);
        }

        Ok(parse_chat_sse_stream(response))
    }
}

#[async_trait]
impl ImageClient for OpenAIClient {
    async fn generate_image(&self, prompt: &str, options: &ImageOptions) -> Result<Vec<u8>> {
        let url = self.create_image(prompt, options).await?;
        self.fetch_image(&url).await
    }

    async fn edit_image(
        &self,
        image: &[u8],
        mask: &[u8],
        prompt: &str,
        options: &ImageOptions,
    ) -> Result<Vec<u8>> {
        let url = self.create_image_edit(image, mask, prompt, options).await?;
        self.fetch_image(&url).await
    }
}

impl LLMClient for OpenAIClient {}
