pub mod chat;
pub mod document;
pub mod review;

pub use chat::{ChatMessage, ChatRole};
pub use document::{Document, DocumentMetadata, REVIEW_SOURCE};
pub use review::ReviewRecord;
