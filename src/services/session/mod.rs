//! 会话服务
//!
//! 显式的会话对象：串联提示词构造、对话客户端和评估，并维护会话记录。

pub mod registry;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::llm::ChatCompletion;
use crate::models::Corpus;
use crate::models::preferences::UserPreferences;
use crate::models::session::Transcript;
use crate::models::turn::{Metric, Turn, TurnStatus};
use crate::services::conversation::ConversationClient;
use crate::services::evaluation;
use crate::services::prompt;

pub use registry::SessionRegistry;

/// 会话参数
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// 系统指令
    pub system_prompt: String,
    /// 对话记忆窗口
    pub memory_window: usize,
    /// 单次调用超时
    pub request_timeout: Duration,
    /// 每个匹配类别的抽样条数
    pub max_insights: usize,
    /// 抽样随机种子
    pub sample_seed: Option<u64>,
}

impl SessionSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            system_prompt: config.llm.system_prompt.clone(),
            memory_window: config.llm.memory_window,
            request_timeout: Duration::from_secs(config.llm.request_timeout_secs),
            max_insights: config.prompt.max_insights,
            sample_seed: config.prompt.sample_seed,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::development())
    }
}

/// 单轮处理结果
#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    /// 记录下的轮次
    pub turn: Turn,
    /// 用于评估的参考回答
    pub reference: String,
    /// 评估指标
    pub metric: Metric,
}

/// 对话会话
pub struct ChatSession {
    id: String,
    created_at: DateTime<Utc>,
    preferences: UserPreferences,
    client: ConversationClient,
    transcript: Transcript,
    rng: StdRng,
    max_insights: usize,
}

impl ChatSession {
    /// 创建会话
    pub fn open(
        preferences: UserPreferences,
        model: Arc<dyn ChatCompletion>,
        settings: &SessionSettings,
    ) -> Self {
        let rng = match settings.sample_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let client = ConversationClient::new(
            model,
            &settings.system_prompt,
            settings.memory_window,
            settings.request_timeout,
        );

        let session = Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            preferences,
            client,
            transcript: Transcript::new(),
            rng,
            max_insights: settings.max_insights,
        };

        info!(
            session_id = %session.id,
            goal = %session.preferences.goal,
            experience = %session.preferences.experience,
            model = %session.client.model_name(),
            "Session opened"
        );
        session
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn client(&self) -> &ConversationClient {
        &self.client
    }

    /// 处理一次提问
    ///
    /// 依次：构造提示词、调用模型、记录轮次、查找参考回答、打分并记录指标。
    /// 远程失败时错误提示作为回复同样被记录和打分。
    pub async fn process_query(&mut self, corpus: &Corpus, query: &str) -> TurnReport {
        let started = Instant::now();

        let prompt = {
            let history = self.transcript.history();
            prompt::compose_prompt(
                query,
                &corpus.content,
                &history,
                &self.preferences,
                &mut self.rng,
                self.max_insights,
            )
        };

        let completion = self.client.predict(&prompt).await;
        let status = if completion.is_failed() {
            TurnStatus::Failed
        } else {
            TurnStatus::Answered
        };
        let turn = Turn::new(
            self.transcript.next_turn_number(),
            query,
            &completion.display_text(),
            status,
        );

        let reference = evaluation::resolve_reference(query, &corpus.curated);
        let metric = evaluation::score(&reference, &turn.response);
        self.transcript.record(turn.clone(), metric);

        info!(
            session_id = %self.id,
            turn = turn.turn_number,
            failed = turn.is_failed(),
            bleu = metric.bleu,
            wer = metric.wer,
            latency_ms = started.elapsed().as_millis() as u64,
            "Query processed"
        );

        TurnReport {
            turn,
            reference,
            metric,
        }
    }

    /// 结束会话，返回完整记录
    pub fn close(self) -> Transcript {
        info!(session_id = %self.id, turns = self.transcript.len(), "Session closed");
        self.transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::llm::MockChatCompletion;
    use crate::models::content::{ContentRow, ContentTable};
    use crate::models::curated::{CuratedEntry, CuratedSet};
    use crate::models::preferences::{ExperienceLevel, FitnessGoal};
    use crate::services::evaluation::NO_REFERENCE;

    fn settings() -> SessionSettings {
        SessionSettings {
            sample_seed: Some(11),
            ..SessionSettings::default()
        }
    }

    fn prefs() -> UserPreferences {
        UserPreferences::new(FitnessGoal::BuildMuscle, ExperienceLevel::Beginner, "")
    }

    #[tokio::test]
    async fn test_history_and_metrics_stay_parallel() {
        let mut mock = MockChatCompletion::new();
        mock.expect_model().return_const("mock".to_string());
        let mut calls = 0;
        mock.expect_complete().times(3).returning(move |_| {
            calls += 1;
            if calls == 2 {
                Err(AppError::Completion("quota exceeded".to_string()))
            } else {
                Ok(format!("answer {calls}"))
            }
        });

        let mut session = ChatSession::open(prefs(), Arc::new(mock), &settings());
        let corpus = Corpus::default();

        for query in ["first", "second", "third"] {
            session.process_query(&corpus, query).await;
            let transcript = session.transcript();
            assert_eq!(transcript.turns().len(), transcript.metrics().len());
        }

        let turns = session.transcript().turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].response, "answer 1");
        assert!(turns[1].is_failed());
        assert_eq!(
            turns[1].response,
            "An error occurred: quota exceeded. Please try rephrasing your question."
        );
        assert_eq!(turns[2].turn_number, 3);
    }

    #[tokio::test]
    async fn test_prompt_carries_full_history() {
        let mut mock = MockChatCompletion::new();
        mock.expect_model().return_const("mock".to_string());
        mock.expect_complete()
            .times(1)
            .returning(|_| Ok("A1".to_string()));
        mock.expect_complete()
            .withf(|messages| {
                messages
                    .last()
                    .is_some_and(|m| m.content.contains("You asked: Q1. I responded: A1"))
            })
            .times(1)
            .returning(|_| Ok("A2".to_string()));

        let mut session = ChatSession::open(prefs(), Arc::new(mock), &settings());
        let corpus = Corpus::default();

        session.process_query(&corpus, "Q1").await;
        let report = session.process_query(&corpus, "Q2").await;
        assert_eq!(report.turn.response, "A2");
    }

    #[tokio::test]
    async fn test_reference_lookup_and_scoring() {
        let reply = "Eat plenty of protein and train every muscle group twice weekly";
        let mut mock = MockChatCompletion::new();
        mock.expect_model().return_const("mock".to_string());
        mock.expect_complete().returning(move |_| Ok(reply.to_string()));

        let mut content = ContentTable::new();
        content.insert("muscle", vec![ContentRow::new("muscle.pdf", "protein")]);
        let curated = CuratedSet::new(vec![CuratedEntry::new(
            "How do I build muscle fast?",
            reply,
        )]);
        let corpus = Corpus::new(content, curated);

        let mut session = ChatSession::open(prefs(), Arc::new(mock), &settings());

        let report = session.process_query(&corpus, "build muscle").await;
        assert_eq!(report.reference, reply);
        assert!((report.metric.bleu - 1.0).abs() < 1e-12);
        assert_eq!(report.metric.wer, 0.0);

        let report = session.process_query(&corpus, "swimming drills").await;
        assert_eq!(report.reference, NO_REFERENCE);
        assert!(report.metric.wer > 0.0);
    }

    #[tokio::test]
    async fn test_close_returns_transcript() {
        let mut mock = MockChatCompletion::new();
        mock.expect_model().return_const("mock".to_string());
        mock.expect_complete().returning(|_| Ok("ok".to_string()));

        let mut session = ChatSession::open(prefs(), Arc::new(mock), &settings());
        session.process_query(&Corpus::default(), "hello").await;

        let transcript = session.close();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.turns()[0].query, "hello");
    }
}
