//! 会话注册表
//!
//! HTTP 模式下按 ID 保存会话。每个会话独占一把异步锁，同一会话内的提问串行处理。
//! 会话在 DELETE 时移除；长时间未访问的会话由 [`SessionRegistry::evict_idle`] 清理。

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::services::session::ChatSession;

pub type SharedSession = Arc<Mutex<ChatSession>>;

struct Entry {
    session: SharedSession,
    last_active: Instant,
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, Entry>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记会话，返回其 ID
    pub fn insert(&self, session: ChatSession) -> String {
        let id = session.id().to_string();
        let entry = Entry {
            session: Arc::new(Mutex::new(session)),
            last_active: Instant::now(),
        };
        self.sessions.insert(id.clone(), entry);
        id
    }

    /// 取出会话并刷新其最近访问时间
    pub fn get(&self, id: &str) -> Option<SharedSession> {
        self.sessions.get_mut(id).map(|mut entry| {
            entry.last_active = Instant::now();
            entry.session.clone()
        })
    }

    /// 移除会话，返回其共享句柄
    pub fn remove(&self, id: &str) -> Option<SharedSession> {
        self.sessions.remove(id).map(|(_, entry)| entry.session)
    }

    /// 移除超过 `max_idle` 未访问的会话，返回移除数量
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut evicted = 0;
        self.sessions.retain(|id, entry| {
            let keep = entry.last_active.elapsed() < max_idle;
            if !keep {
                debug!(session_id = %id, "Evicting idle session");
                evicted += 1;
            }
            keep
        });
        evicted
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.sessions.len())
            .finish()
    }
}
