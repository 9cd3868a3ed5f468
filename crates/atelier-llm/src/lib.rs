pub mod types;
pub mod traits;
pub mod streaming;
pub mod wire;
pub mod openai;

pub use traits::{
    ChatClient,
    ImageClient,
    LLMClient,
    ChatRequest, ChatOptions, ChatStream,
    ImageOptions,
};

pub use streaming::{collect_text, parse_chat_sse_stream, StreamEvent};
pub use openai::OpenAIClient;
pub use types::{Content, ContentPart, DisplayItem, ImageAttachment, Message};
pub use wire::{message_to_wire, to_wire, WireContent, WireMessage, WirePart};
