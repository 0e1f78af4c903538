//! 错误处理模块
//!
//! 定义应用程序的错误类型和错误处理逻辑。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(String),

    /// 语料文件格式错误
    #[error("语料文件格式错误 ({path}): {detail}")]
    CorpusFormat { path: String, detail: String },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 远程对话补全错误
    #[error("{0}")]
    Completion(String),

    /// 超时错误
    #[error("request timed out: {0}")]
    Timeout(String),

    /// 资源不存在
    #[error("资源不存在: {0}")]
    NotFound(String),

    /// 参数验证错误
    #[error("参数验证失败: {0}")]
    Validation(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    Serialization(String),
}

impl AppError {
    /// 构造语料格式错误
    pub fn corpus_format(path: impl AsRef<std::path::Path>, detail: impl std::fmt::Display) -> Self {
        AppError::CorpusFormat {
            path: path.as_ref().display().to_string(),
            detail: detail.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

impl From<dialoguer::Error> for AppError {
    fn from(e: dialoguer::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AppError::Timeout(e.to_string())
        } else {
            AppError::Completion(e.to_string())
        }
    }
}

/// Axum response implementation for AppError
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = (&self).into();
        let mut response = ErrorResponse::new(&code, &self.to_string());
        if let AppError::CorpusFormat { path, .. } = &self {
            response = response.with_details(path);
        }
        let body = Json(response);
        (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        )
            .into_response()
    }
}

/// 错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,
    /// 错误消息
    pub message: String,
    /// 详细信息
    pub details: Option<String>,
}

impl ErrorResponse {
    /// 创建新错误响应
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// 添加详细信息
    pub fn with_details(mut self, details: &str) -> Self {
        self.details = Some(details.to_string());
        self
    }
}

/// HTTP 状态码映射
impl From<&AppError> for (u16, String) {
    fn from(err: &AppError) -> (u16, String) {
        match err {
            AppError::NotFound(_) => (404, "NOT_FOUND".to_string()),
            AppError::Validation(_) => (400, "BAD_REQUEST".to_string()),
            AppError::Timeout(_) => (504, "TIMEOUT".to_string()),
            AppError::Completion(_) => (502, "COMPLETION_ERROR".to_string()),
            AppError::CorpusFormat { .. } => (500, "CORPUS_ERROR".to_string()),
            _ => (500, "INTERNAL_ERROR".to_string()),
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let (status, code) = (&AppError::NotFound("session".into())).into();
        assert_eq!(status, 404);
        assert_eq!(code, "NOT_FOUND");

        let (status, _) = (&AppError::Validation("query".into())).into();
        assert_eq!(status, 400);

        let (status, code) = (&AppError::Io("disk".into())).into();
        assert_eq!(status, 500);
        assert_eq!(code, "INTERNAL_ERROR");
    }

    #[test]
    fn test_local_failures_map_to_internal_error() {
        for err in [
            AppError::Io("disk".into()),
            AppError::Config("port".into()),
            AppError::Serialization("json".into()),
        ] {
            let (status, code) = (&err).into();
            assert_eq!(status, 500);
            assert_eq!(code, "INTERNAL_ERROR");
        }
    }

    #[test]
    fn test_corpus_format_message_names_path() {
        let err = AppError::corpus_format("dataset/cardio.jsonl", "line 3: expected value");
        let message = err.to_string();
        assert!(message.contains("dataset/cardio.jsonl"));
        assert!(message.contains("line 3"));
    }

    #[test]
    fn test_error_response_details() {
        let response = ErrorResponse::new("BAD_REQUEST", "query is empty").with_details("query");
        assert_eq!(response.details.as_deref(), Some("query"));
    }
}
