//! 服务模块

pub mod advice;
pub mod conversation;
pub mod evaluation;
pub mod prompt;
pub mod session;

pub use conversation::{Completion, ConversationClient, ConversationMemory};
pub use evaluation::{NO_REFERENCE, resolve_reference, score};
pub use prompt::{NO_DATA_FOUND, compose_prompt};
pub use session::{ChatSession, SessionRegistry, SessionSettings, TurnReport};
