//! 提问 DTO
//!
//! 定义提问与会话记录相关的请求和响应数据结构。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::session::Transcript;
use crate::services::session::TurnReport;

/// 单次提问的最大字符数
pub const MAX_QUERY_CHARS: usize = 2000;

/// 提问请求
#[derive(Debug, Deserialize)]
pub struct SubmitQueryRequest {
    pub query: String,
}

impl SubmitQueryRequest {
    /// 拒绝空白问题和超长问题
    pub fn validate(&self) -> Result<(), AppError> {
        if self.query.trim().is_empty() {
            return Err(AppError::Validation("query must not be blank".to_string()));
        }
        let length = self.query.chars().count();
        if length > MAX_QUERY_CHARS {
            return Err(AppError::Validation(format!(
                "query is {length} characters, the limit is {MAX_QUERY_CHARS}"
            )));
        }
        Ok(())
    }
}

/// 提问响应
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub turn_number: u64,
    pub query: String,
    pub response: String,
    pub reference: String,
    pub bleu: f64,
    pub wer: f64,
    /// 远程调用是否失败
    pub failed: bool,
    pub completed_at: DateTime<Utc>,
}

impl From<TurnReport> for QueryResponse {
    fn from(report: TurnReport) -> Self {
        let failed = report.turn.is_failed();
        Self {
            turn_number: report.turn.turn_number,
            query: report.turn.query,
            response: report.turn.response,
            reference: report.reference,
            bleu: report.metric.bleu,
            wer: report.metric.wer,
            failed,
            completed_at: report.turn.completed_at,
        }
    }
}

/// 会话记录中的一条
#[derive(Debug, Serialize)]
pub struct TranscriptEntry {
    pub turn_number: u64,
    pub query: String,
    pub response: String,
    pub failed: bool,
    pub bleu: f64,
    pub wer: f64,
}

/// 会话记录响应
#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub session_id: String,
    pub turns: Vec<TranscriptEntry>,
}

impl TranscriptResponse {
    pub fn new(session_id: &str, transcript: &Transcript) -> Self {
        let turns = transcript
            .turns()
            .iter()
            .zip(transcript.metrics())
            .map(|(turn, metric)| TranscriptEntry {
                turn_number: turn.turn_number,
                query: turn.query.clone(),
                response: turn.response.clone(),
                failed: turn.is_failed(),
                bleu: metric.bleu,
                wer: metric.wer,
            })
            .collect();

        Self {
            session_id: session_id.to_string(),
            turns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", false)]
    #[case("   \n\t", false)]
    #[case("How many sets?", true)]
    fn test_validate_blank(#[case] query: &str, #[case] valid: bool) {
        let request = SubmitQueryRequest {
            query: query.to_string(),
        };
        assert_eq!(request.validate().is_ok(), valid);
    }

    #[test]
    fn test_validate_length_counts_characters() {
        let at_limit = SubmitQueryRequest {
            query: "é".repeat(MAX_QUERY_CHARS),
        };
        assert!(at_limit.validate().is_ok());

        let over_limit = SubmitQueryRequest {
            query: "a".repeat(MAX_QUERY_CHARS + 1),
        };
        assert!(matches!(
            over_limit.validate(),
            Err(AppError::Validation(_))
        ));
    }
}
