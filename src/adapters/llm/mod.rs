//! LLM adapters - ChatModel implementations.

pub mod openai_chat;

pub use openai_chat::{OpenAiChatConfig, OpenAiChatModel};
