use std::collections::HashMap;

use anyhow::{Context, Result};
use futures::future::try_join_all;

use atelier_llm::{message_to_wire, ImageClient, ImageOptions, WireContent, WireMessage};
use atelier_store::{ContentStore, Thread};

use crate::modes::BehaviorMode;

/// Rebuild the full request payload for a thread.
///
/// A mode with instructions contributes the leading system entry; every
/// thread message follows in insertion order with attachment bytes
/// re-inlined from the content store. An attachment that has gone
/// missing drops out of the payload; it never fails the request.
pub async fn build_request(
    thread: &Thread,
    mode: &BehaviorMode,
    content: &ContentStore,
) -> Vec<WireMessage> {
    let mut messages = Vec::with_capacity(thread.messages.len() + 1);

    if mode.has_instructions() {
        messages.push(WireMessage {
            role: "system".to_string(),
            content: WireContent::Text(mode.instructions.clone()),
        });
    }

    // Prefetch attachment bytes so the wire conversion itself stays pure
    let mut resolved: HashMap<String, Option<Vec<u8>>> = HashMap::new();
    for message in &thread.messages {
        for filename in message.content().image_filenames() {
            if !resolved.contains_key(filename) {
                let bytes = content.get(filename).await.ok();
                resolved.insert(filename.to_string(), bytes);
            }
        }
    }

    for message in &thread.messages {
        messages.push(message_to_wire(message, |filename| {
            resolved.get(filename).and_then(|bytes| bytes.clone())
        }));
    }

    messages
}

/// Fan out `count` generation calls and wait for all of them.
///
/// All-or-nothing: the first failing worker fails the whole batch, and
/// no artifact from the surviving workers is returned. Completion order
/// across workers is not meaningful; results come back in request order.
pub async fn generate_batch(
    client: &dyn ImageClient,
    prompt: &str,
    count: u32,
    options: &ImageOptions,
) -> Result<Vec<Vec<u8>>> {
    let workers = (0..count).map(|_| client.generate_image(prompt, options));

    try_join_all(workers)
        .await
        .with_context(|| format!("Image generation batch of {} failed", count))
}
