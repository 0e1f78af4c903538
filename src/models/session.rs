use serde::{Deserialize, Serialize};

use crate::models::turn::{Metric, Turn};

/// 会话记录
///
/// 只追加的轮次序列与平行的指标序列。每次记录后两者长度相等。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
    metrics: Vec<Metric>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一轮及其指标，这是唯一的修改入口
    pub fn record(&mut self, turn: Turn, metric: Metric) {
        self.turns.push(turn);
        self.metrics.push(metric);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// 下一轮的序号
    pub fn next_turn_number(&self) -> u64 {
        self.turns.len() as u64 + 1
    }

    /// 以 (问题, 回复) 形式返回完整历史，用于提示词
    pub fn history(&self) -> Vec<(&str, &str)> {
        self.turns
            .iter()
            .map(|turn| (turn.query.as_str(), turn.response.as_str()))
            .collect()
    }

    /// 平均指标，空记录返回 None
    pub fn mean_metric(&self) -> Option<Metric> {
        if self.metrics.is_empty() {
            return None;
        }
        let n = self.metrics.len() as f64;
        let (bleu, wer) = self
            .metrics
            .iter()
            .fold((0.0, 0.0), |(b, w), m| (b + m.bleu, w + m.wer));
        Some(Metric::new(bleu / n, wer / n))
    }
}
