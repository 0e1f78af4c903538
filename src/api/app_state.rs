use crate::config::AppConfig;
use crate::llm::ChatCompletion;
use crate::models::Corpus;
use crate::observability::AppMetrics;
use crate::services::session::{SessionRegistry, SessionSettings};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::info;

/// 空闲会话清理的最长检查间隔
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Application state shared by all HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Content tables and curated references, loaded once at startup
    pub corpus: Arc<Corpus>,
    /// Chat completion backend used by every new session
    pub chat_model: Arc<dyn ChatCompletion>,
    /// Live sessions keyed by id
    pub sessions: Arc<SessionRegistry>,
    /// Parameters applied to newly opened sessions
    pub settings: Arc<SessionSettings>,
    /// Request counters exposed on /metrics
    pub metrics: Arc<AppMetrics>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("corpus_categories", &self.corpus.content.category_count())
            .field("curated_entries", &self.corpus.curated.len())
            .field("chat_model", &self.chat_model.model())
            .field("sessions", &self.sessions)
            .field("settings", &self.settings)
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        corpus: Corpus,
        chat_model: Arc<dyn ChatCompletion>,
        settings: SessionSettings,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            corpus: Arc::new(corpus),
            chat_model,
            sessions: Arc::new(SessionRegistry::new()),
            settings: Arc::new(settings),
            metrics,
        }
    }

    /// Create application state with session settings taken from config
    pub fn from_config(
        config: &AppConfig,
        corpus: Corpus,
        chat_model: Arc<dyn ChatCompletion>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self::new(
            corpus,
            chat_model,
            SessionSettings::from_config(config),
            metrics,
        )
    }

    /// 启动后台任务，定期移除空闲超过 `max_idle` 的会话
    ///
    /// `max_idle` 必须大于 0。
    pub fn spawn_session_sweeper(&self, max_idle: Duration) -> JoinHandle<()> {
        let sessions = self.sessions.clone();
        let metrics = self.metrics.clone();

        tokio::spawn(async move {
            let mut ticker = interval(max_idle.min(SWEEP_INTERVAL));
            loop {
                ticker.tick().await;
                let evicted = sessions.evict_idle(max_idle);
                for _ in 0..evicted {
                    metrics.session_closed();
                }
                if evicted > 0 {
                    info!("Evicted {} idle sessions, {} remaining", evicted, sessions.len());
                }
            }
        })
    }
}
