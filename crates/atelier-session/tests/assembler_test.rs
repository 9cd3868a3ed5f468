use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::TempDir;

use atelier_llm::{Content, ImageAttachment, ImageClient, ImageOptions, Message, WireContent};
use atelier_session::{build_request, generate_batch, BehaviorMode};
use atelier_store::{ContentStore, Thread};
use chrono::Utc;

fn store() -> (TempDir, ContentStore) {
    let dir = TempDir::new().unwrap();
    let store = ContentStore::new(dir.path().join("uploaded_images"));
    (dir, store)
}

fn thread_with(messages: Vec<Message>) -> Thread {
    Thread {
        id: uuid::Uuid::new_v4(),
        last_updated: Utc::now(),
        messages,
    }
}

#[tokio::test]
async fn test_build_request_preserves_message_order() {
    let (_dir, content) = store();

    let thread = thread_with(vec![
        Message::user("first"),
        Message::assistant("second"),
        Message::user("third"),
    ]);

    let wire = build_request(&thread, &BehaviorMode::passthrough(), &content).await;

    assert_eq!(wire.len(), 3);
    assert_eq!(wire[0].role, "user");
    assert_eq!(wire[1].role, "assistant");
    assert_eq!(wire[2].role, "user");
    assert_eq!(wire[0].content, WireContent::Text("first".to_string()));
}

#[tokio::test]
async fn test_build_request_prepends_instructions() {
    let (_dir, content) = store();
    let thread = thread_with(vec![Message::user("hi")]);

    let mode = BehaviorMode::new("Reviewer", "You review code.");
    let wire = build_request(&thread, &mode, &content).await;

    assert_eq!(wire.len(), 2);
    assert_eq!(wire[0].role, "system");
    assert_eq!(
        wire[0].content,
        WireContent::Text("You review code.".to_string())
    );
}

#[tokio::test]
async fn test_build_request_inlines_stored_attachments() {
    let (_dir, content) = store();

    let filename = content.put(b"pixels", "png", "ns").await.unwrap();
    let thread = thread_with(vec![Message::user(Content::mixed(
        "look",
        vec![ImageAttachment {
            filename,
            original_name: "photo.png".to_string(),
        }],
    ))]);

    let wire = build_request(&thread, &BehaviorMode::passthrough(), &content).await;

    assert_eq!(wire.len(), 1);
    // Text part plus one inlined image
    assert_eq!(wire[0].content.len(), 2);
}

#[tokio::test]
async fn test_build_request_drops_missing_attachments() {
    let (_dir, content) = store();

    let thread = thread_with(vec![Message::user(Content::mixed(
        "look",
        vec![ImageAttachment {
            filename: "ns_gone.png".to_string(),
            original_name: "gone.png".to_string(),
        }],
    ))]);

    let wire = build_request(&thread, &BehaviorMode::passthrough(), &content).await;

    // The text part survives alone
    assert_eq!(wire.len(), 1);
    assert_eq!(wire[0].content.len(), 1);
}

struct CountingImageClient {
    calls: AtomicUsize,
    fail_on: usize,
}

#[async_trait]
impl ImageClient for CountingImageClient {
    async fn generate_image(&self, _prompt: &str, _options: &ImageOptions) -> anyhow::Result<Vec<u8>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            anyhow::bail!("worker {} failed", call);
        }
        Ok(vec![call as u8])
    }

    async fn edit_image(
        &self,
        _image: &[u8],
        _mask: &[u8],
        _prompt: &str,
        _options: &ImageOptions,
    ) -> anyhow::Result<Vec<u8>> {
        Ok(vec![])
    }
}

#[tokio::test]
async fn test_generate_batch_returns_one_artifact_per_request() {
    let client = CountingImageClient {
        calls: AtomicUsize::new(0),
        fail_on: usize::MAX,
    };

    let artifacts = generate_batch(&client, "a fox", 4, &ImageOptions::default())
        .await
        .unwrap();

    assert_eq!(artifacts.len(), 4);
    assert_eq!(client.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_generate_batch_fails_as_a_whole() {
    let client = CountingImageClient {
        calls: AtomicUsize::new(0),
        fail_on: 2,
    };

    let result = generate_batch(&client, "a fox", 3, &ImageOptions::default()).await;

    let err = result.err().expect("batch should fail");
    assert!(format!("{:#}", err).contains("batch of 3 failed"));
}
