use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use atelier_llm::{
    ChatClient, ChatRequest, ChatStream, ImageClient, ImageOptions, StreamEvent, WireContent,
};
use atelier_session::{BehaviorMode, LlmConfig, ModifierSet, Session, Upload};
use atelier_store::{StorageConfig, StoreClient};

/// Chat client that replies with a fixed chunk script and remembers the
/// last request it saw.
struct ScriptedChatClient {
    chunks: Vec<&'static str>,
    last_request: Mutex<Option<ChatRequest>>,
}

impl ScriptedChatClient {
    fn new(chunks: Vec<&'static str>) -> Self {
        Self {
            chunks,
            last_request: Mutex::new(None),
        }
    }

    fn last_request(&self) -> ChatRequest {
        self.last_request.lock().unwrap().clone().expect("no request sent")
    }
}

#[async_trait]
impl ChatClient for ScriptedChatClient {
    async fn chat_stream(&self, request: ChatRequest) -> anyhow::Result<ChatStream> {
        *self.last_request.lock().unwrap() = Some(request);

        let events: Vec<anyhow::Result<StreamEvent>> = self
            .chunks
            .iter()
            .map(|chunk| {
                Ok(StreamEvent::Message {
                    content: chunk.to_string(),
                })
            })
            .chain(std::iter::once(Ok(StreamEvent::Done {
                finish_reason: Some("stop".to_string()),
            })))
            .collect();

        Ok(Box::pin(futures::stream::iter(events)))
    }
}

/// Image client that fails on a chosen call, counting calls across the
/// whole batch.
struct FlakyImageClient {
    calls: AtomicUsize,
    fail_on: usize,
}

impl FlakyImageClient {
    fn reliable() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on: usize::MAX,
        }
    }

    fn failing_on(call: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on: call,
        }
    }
}

#[async_trait]
impl ImageClient for FlakyImageClient {
    async fn generate_image(&self, _prompt: &str, _options: &ImageOptions) -> anyhow::Result<Vec<u8>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            anyhow::bail!("generator worker {} exploded", call);
        }
        Ok(format!("artifact-{}", call).into_bytes())
    }

    async fn edit_image(
        &self,
        _image: &[u8],
        _mask: &[u8],
        _prompt: &str,
        _options: &ImageOptions,
    ) -> anyhow::Result<Vec<u8>> {
        Ok(b"edited-bytes".to_vec())
    }
}

fn llm_config() -> LlmConfig {
    LlmConfig {
        chat_model: "gpt-4o".to_string(),
        image_model: "dall-e-3".to_string(),
        edit_model: "dall-e-2".to_string(),
        temperature: None,
    }
}

fn session_with(
    chat: Arc<ScriptedChatClient>,
    images: Arc<FlakyImageClient>,
) -> (TempDir, Session) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(StoreClient::new(&StorageConfig::new(dir.path())));
    let session = Session::new(store, chat, images, llm_config());
    (dir, session)
}

#[tokio::test]
async fn test_run_turn_persists_both_sides() {
    let chat = Arc::new(ScriptedChatClient::new(vec!["h", "i"]));
    let (_dir, mut session) = session_with(chat.clone(), Arc::new(FlakyImageClient::reliable()));

    let upload = Upload::new("cat.png", "image/png", b"cat-bytes".to_vec());
    let thread = session.run_turn("hello", &[upload], None).await.unwrap();

    assert_eq!(thread.messages.len(), 2);
    assert_eq!(thread.messages[0].role(), "user");
    assert_eq!(thread.messages[1].role(), "assistant");
    assert_eq!(thread.messages[1].content().as_text(), Some("hi"));

    // The attachment reached the content store under the thread namespace
    let filenames = thread.messages[0].content().image_filenames();
    assert_eq!(filenames.len(), 1);
    assert!(filenames[0].starts_with(&thread.id.to_string()));
    assert!(session.store().content().exists(filenames[0]).await);

    // The outbound payload inlined the image: text part + image part
    let request = chat.last_request();
    assert_eq!(request.model, "gpt-4o");
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.messages[0].content.len(), 2);
}

#[tokio::test]
async fn test_mode_instructions_lead_the_payload() {
    let chat = Arc::new(ScriptedChatClient::new(vec!["ok"]));
    let (_dir, mut session) = session_with(chat.clone(), Arc::new(FlakyImageClient::reliable()));

    session.select_mode(BehaviorMode::new("Reviewer", "You review Rust code."));
    session.run_turn("look at this", &[], None).await.unwrap();

    let request = chat.last_request();
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, "system");
    assert_eq!(
        request.messages[0].content,
        WireContent::Text("You review Rust code.".to_string())
    );
    assert_eq!(request.messages[1].role, "user");
}

#[tokio::test]
async fn test_passthrough_mode_sends_no_system_entry() {
    let chat = Arc::new(ScriptedChatClient::new(vec!["ok"]));
    let (_dir, mut session) = session_with(chat.clone(), Arc::new(FlakyImageClient::reliable()));

    session.run_turn("plain question", &[], None).await.unwrap();

    let request = chat.last_request();
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.messages[0].role, "user");
}

#[tokio::test]
async fn test_abandoned_stream_leaves_thread_untouched() {
    let chat = Arc::new(ScriptedChatClient::new(vec!["never", "read"]));
    let (_dir, mut session) = session_with(chat, Arc::new(FlakyImageClient::reliable()));

    let stream = session.send_message("hello", &[], None).await.unwrap();
    drop(stream);

    let id = session.current_thread().unwrap();
    let thread = session.store().threads().get(id).await.unwrap();

    // User turn persisted, no assistant turn without record_reply
    assert_eq!(thread.messages.len(), 1);
    assert_eq!(thread.messages[0].role(), "user");
}

#[tokio::test]
async fn test_record_reply_requires_a_thread() {
    let chat = Arc::new(ScriptedChatClient::new(vec![]));
    let (_dir, session) = session_with(chat, Arc::new(FlakyImageClient::reliable()));

    assert!(session.record_reply("orphan reply").await.is_err());
}

#[tokio::test]
async fn test_failed_batch_writes_nothing() {
    let chat = Arc::new(ScriptedChatClient::new(vec![]));
    let images = Arc::new(FlakyImageClient::failing_on(2));
    let (_dir, session) = session_with(chat, images);

    let result = session
        .generate_images("a red fox", &ModifierSet::default(), 3)
        .await;

    assert!(result.is_err());
    assert!(session
        .store()
        .ledger()
        .list_generations()
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_successful_batch_is_recorded_with_expanded_prompt() {
    let chat = Arc::new(ScriptedChatClient::new(vec![]));
    let (_dir, session) = session_with(chat, Arc::new(FlakyImageClient::reliable()));

    let modifiers = ModifierSet {
        styles: vec!["Art Deco".to_string()],
        ..Default::default()
    };

    let record = session
        .generate_images("a red fox", &modifiers, 3)
        .await
        .unwrap();

    assert_eq!(record.prompt, "a red fox, Art Deco");
    assert_eq!(record.image_paths.len(), 3);

    let listed = session.store().ledger().list_generations().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, record.id);
}

#[tokio::test]
async fn test_inpaint_records_original_and_edit() {
    let chat = Arc::new(ScriptedChatClient::new(vec![]));
    let (_dir, session) = session_with(chat, Arc::new(FlakyImageClient::reliable()));

    let record = session
        .inpaint(b"original-bytes", b"mask-bytes", "replace the sky")
        .await
        .unwrap();

    assert_eq!(
        std::fs::read(&record.original_image_path).unwrap(),
        b"original-bytes"
    );
    assert_eq!(
        std::fs::read(&record.inpainted_image_path).unwrap(),
        b"edited-bytes"
    );

    let listed = session.store().ledger().list_inpaintings().await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_ensure_thread_recovers_from_deleted_selection() {
    let chat = Arc::new(ScriptedChatClient::new(vec!["ok"]));
    let (_dir, mut session) = session_with(chat, Arc::new(FlakyImageClient::reliable()));

    let first = session.ensure_thread().await.unwrap();
    session.store().threads().delete(first.id).await.unwrap();

    let second = session.ensure_thread().await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(session.current_thread(), Some(second.id));
}
