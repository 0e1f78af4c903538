use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 轮次状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    /// 模型正常回复
    #[default]
    Answered,
    /// 远程调用失败，回复为错误提示文本
    Failed,
}

/// 对话轮次
///
/// 一次 (问题, 回复) 记录。失败的调用同样记为一轮，回复为错误提示。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    /// 轮次序号（从 1 开始）
    pub turn_number: u64,
    /// 用户原始问题
    pub query: String,
    /// 模型回复或错误提示
    pub response: String,
    /// 轮次状态
    pub status: TurnStatus,
    /// 完成时间
    pub completed_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(turn_number: u64, query: &str, response: &str, status: TurnStatus) -> Self {
        Self {
            turn_number,
            query: query.to_string(),
            response: response.to_string(),
            status,
            completed_at: Utc::now(),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == TurnStatus::Failed
    }
}

/// 单轮评估指标
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Metric {
    /// BLEU 分数，取值 [0, 1]
    pub bleu: f64,
    /// 词错误率，>= 0，可超过 1
    pub wer: f64,
}

impl Metric {
    pub fn new(bleu: f64, wer: f64) -> Self {
        Self { bleu, wer }
    }
}
