pub mod content;
pub mod message;

pub use content::{Content, ContentPart, DisplayItem, ImageAttachment};
pub use message::Message;
