//! 对话模型模块
//!
//! 远程对话补全的抽象与实现。

pub mod offline;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::config::LlmConfig;
use crate::error::{AppError, Result};

pub use offline::OfflineChatModel;
pub use openai::OpenAiChatModel;

/// 消息角色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// 系统消息
    System,
    /// 用户消息
    User,
    /// 助手消息
    Assistant,
}

/// 对话消息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// 对话补全能力
///
/// 实现方需要把网络、鉴权、限流和响应格式问题都表达为错误，而不是 panic。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// 按顺序发送消息，返回模型回复文本
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String>;

    /// 模型名称
    fn model(&self) -> String;
}

/// 按配置创建对话模型
pub fn create_chat_model(config: &LlmConfig) -> Result<Arc<dyn ChatCompletion>> {
    match config.backend.as_str() {
        "openai" => Ok(Arc::new(OpenAiChatModel::from_config(config)?)),
        "offline" => Ok(Arc::new(OfflineChatModel::new())),
        other => Err(AppError::Config(format!("unknown llm backend: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serialization() {
        let message = ChatMessage::assistant("Drink water.");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "Drink water.");
    }

    #[test]
    fn test_create_chat_model_backends() {
        let mut config = crate::config::AppConfig::offline().llm;
        let model = create_chat_model(&config).unwrap();
        assert_eq!(model.model(), "offline");

        config.backend = "openai".into();
        config.api_key = "sk-test".into();
        let model = create_chat_model(&config).unwrap();
        assert_eq!(model.model(), "gpt-3.5-turbo");

        config.backend = "nope".into();
        assert!(matches!(create_chat_model(&config), Err(AppError::Config(_))));
    }
}
