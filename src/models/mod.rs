//! 核心数据模型模块
//!
//! 定义 Fitbot 的核心数据结构：内容表、参考问答、用户偏好、轮次与会话记录。

pub mod content;
pub mod curated;
pub mod preferences;
pub mod session;
pub mod turn;

pub use content::{ContentRow, ContentTable};
pub use curated::{CuratedEntry, CuratedSet};
pub use preferences::{ExperienceLevel, FitnessGoal, UserPreferences};
pub use session::Transcript;
pub use turn::{Metric, Turn, TurnStatus};

/// 加载后的只读语料
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    /// 按类别划分的内容表
    pub content: ContentTable,
    /// 参考问答
    pub curated: CuratedSet,
}

impl Corpus {
    pub fn new(content: ContentTable, curated: CuratedSet) -> Self {
        Self { content, curated }
    }
}
