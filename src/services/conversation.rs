//! 对话客户端
//!
//! 包装远程对话补全，维护最近若干轮的滑动窗口记忆。远程调用的任何失败都不会
//! 作为错误返回给调用方，而是转成 [`Completion::Failed`]。

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::llm::{ChatCompletion, ChatMessage};

/// 默认记忆窗口大小
pub const DEFAULT_MEMORY_WINDOW: usize = 3;

/// 一次记忆交换
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub input: String,
    pub output: String,
}

/// 滑动窗口记忆
///
/// 只保留最近 `capacity` 次交换，超出时丢弃最旧的一条。
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    exchanges: VecDeque<Exchange>,
    capacity: usize,
}

impl ConversationMemory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            exchanges: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, input: &str, output: &str) {
        if self.exchanges.len() == self.capacity {
            self.exchanges.pop_front();
        }
        self.exchanges.push_back(Exchange {
            input: input.to_string(),
            output: output.to_string(),
        });
    }

    pub fn exchanges(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter()
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 展开成交替的 user/assistant 消息
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        self.exchanges
            .iter()
            .flat_map(|exchange| {
                [
                    ChatMessage::user(exchange.input.clone()),
                    ChatMessage::assistant(exchange.output.clone()),
                ]
            })
            .collect()
    }
}

/// 一次预测的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// 模型回复
    Reply(String),
    /// 远程调用失败及原因
    Failed(String),
}

impl Completion {
    /// 展示文本：成功时为回复本身，失败时为固定格式的错误提示
    pub fn display_text(&self) -> String {
        match self {
            Completion::Reply(reply) => reply.clone(),
            Completion::Failed(reason) => failure_message(reason),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Completion::Failed(_))
    }
}

/// 失败提示文本
pub fn failure_message(reason: &str) -> String {
    format!("An error occurred: {reason}. Please try rephrasing your question.")
}

/// 对话客户端
pub struct ConversationClient {
    model: Arc<dyn ChatCompletion>,
    memory: ConversationMemory,
    system_prompt: String,
    timeout: Duration,
}

impl ConversationClient {
    pub fn new(
        model: Arc<dyn ChatCompletion>,
        system_prompt: &str,
        memory_window: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            model,
            memory: ConversationMemory::new(memory_window),
            system_prompt: system_prompt.to_string(),
            timeout,
        }
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn model_name(&self) -> String {
        self.model.model()
    }

    /// 组装发送给模型的消息：系统指令、窗口记忆、当前输入
    pub fn build_messages(&self, input: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.memory.len() * 2 + 2);
        messages.push(ChatMessage::system(self.system_prompt.clone()));
        messages.extend(self.memory.to_messages());
        messages.push(ChatMessage::user(input));
        messages
    }

    /// 发送一次预测
    ///
    /// 成功或失败都会占用一个记忆槽位，记录的输出为展示文本。
    pub async fn predict(&mut self, input: &str) -> Completion {
        let messages = self.build_messages(input);
        debug!(
            remembered = self.memory.len(),
            messages = messages.len(),
            "Calling chat model"
        );

        let completion = match tokio::time::timeout(self.timeout, self.model.complete(messages)).await {
            Ok(Ok(reply)) => Completion::Reply(reply),
            Ok(Err(e)) => {
                warn!(error = %e, "Chat completion failed");
                Completion::Failed(e.to_string())
            }
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "Chat completion timed out");
                Completion::Failed(format!(
                    "request timed out after {}s",
                    self.timeout.as_secs()
                ))
            }
        };

        self.memory.push(input, &completion.display_text());
        completion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::llm::{MessageRole, MockChatCompletion};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 记录每次调用收到的消息
    #[derive(Default)]
    struct RecordingModel {
        calls: Mutex<Vec<Vec<ChatMessage>>>,
    }

    #[async_trait]
    impl ChatCompletion for RecordingModel {
        async fn complete(&self, messages: Vec<ChatMessage>) -> crate::error::Result<String> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(messages);
            Ok(format!("reply {}", calls.len()))
        }

        fn model(&self) -> String {
            "recording".to_string()
        }
    }

    struct SlowModel;

    #[async_trait]
    impl ChatCompletion for SlowModel {
        async fn complete(&self, _messages: Vec<ChatMessage>) -> crate::error::Result<String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        }

        fn model(&self) -> String {
            "slow".to_string()
        }
    }

    fn client(model: Arc<dyn ChatCompletion>) -> ConversationClient {
        ConversationClient::new(model, "Be truthful.", DEFAULT_MEMORY_WINDOW, Duration::from_secs(5))
    }

    #[test]
    fn test_memory_window_drops_oldest() {
        let mut memory = ConversationMemory::new(3);
        for i in 1..=5 {
            memory.push(&format!("in {i}"), &format!("out {i}"));
        }

        let inputs: Vec<&str> = memory.exchanges().map(|e| e.input.as_str()).collect();
        assert_eq!(inputs, vec!["in 3", "in 4", "in 5"]);
        assert_eq!(memory.capacity(), 3);
    }

    #[tokio::test]
    async fn test_sixth_call_sees_only_last_three_exchanges() {
        let model = Arc::new(RecordingModel::default());
        let mut client = client(model.clone());

        for i in 1..=6 {
            client.predict(&format!("question {i}")).await;
        }

        let calls = model.calls.lock().unwrap();
        let sixth = &calls[5];

        // system + 3 * (user, assistant) + current user
        assert_eq!(sixth.len(), 8);
        assert_eq!(sixth[0], ChatMessage::system("Be truthful."));
        assert_eq!(sixth[1], ChatMessage::user("question 3"));
        assert_eq!(sixth[2], ChatMessage::assistant("reply 3"));
        assert_eq!(sixth[5], ChatMessage::user("question 5"));
        assert_eq!(sixth[6], ChatMessage::assistant("reply 5"));
        assert_eq!(sixth[7], ChatMessage::user("question 6"));
        assert!(!sixth.iter().any(|m| m.content == "question 1" || m.content == "question 2"));
    }

    #[tokio::test]
    async fn test_failure_is_recovered_and_remembered() {
        let mut mock = MockChatCompletion::new();
        mock.expect_complete()
            .times(1)
            .returning(|_| Err(AppError::Completion("invalid api key".to_string())));

        let mut client = client(Arc::new(mock));
        let completion = client.predict("How do I squat?").await;

        assert_eq!(completion, Completion::Failed("invalid api key".to_string()));
        assert_eq!(
            completion.display_text(),
            "An error occurred: invalid api key. Please try rephrasing your question."
        );

        let remembered: Vec<&Exchange> = client.memory().exchanges().collect();
        assert_eq!(remembered.len(), 1);
        assert_eq!(remembered[0].input, "How do I squat?");
        assert_eq!(remembered[0].output, completion.display_text());
    }

    #[tokio::test]
    async fn test_first_call_sends_system_and_input_only() {
        let mut mock = MockChatCompletion::new();
        mock.expect_complete()
            .withf(|messages| {
                messages.len() == 2
                    && messages[0].role == MessageRole::System
                    && messages[1] == ChatMessage::user("Hello")
            })
            .times(1)
            .returning(|_| Ok("Hi there".to_string()));

        let mut client = client(Arc::new(mock));
        assert_eq!(client.predict("Hello").await, Completion::Reply("Hi there".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_becomes_failure() {
        let mut client = ConversationClient::new(
            Arc::new(SlowModel),
            "sys",
            DEFAULT_MEMORY_WINDOW,
            Duration::from_secs(2),
        );

        let completion = client.predict("anyone there?").await;
        assert_eq!(completion, Completion::Failed("request timed out after 2s".to_string()));
        assert_eq!(client.memory().len(), 1);
    }
}
