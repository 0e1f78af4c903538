//! 离线对话模型，不访问网络

use async_trait::async_trait;

use crate::error::Result;
use crate::llm::{ChatCompletion, ChatMessage, MessageRole};

/// 本地占位模型，用于没有 API 密钥时运行演示
#[derive(Debug, Clone, Default)]
pub struct OfflineChatModel;

impl OfflineChatModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChatCompletion for OfflineChatModel {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let question = messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.lines().next().unwrap_or_default().to_string())
            .unwrap_or_default();

        Ok(format!(
            "No language model is configured, so I can only acknowledge your message: {question}"
        ))
    }

    fn model(&self) -> String {
        "offline".to_string()
    }
}
