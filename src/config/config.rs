use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::services::conversation::DEFAULT_MEMORY_WINDOW;
use crate::services::prompt::DEFAULT_MAX_INSIGHTS;

/// 默认系统指令
pub const DEFAULT_SYSTEM_PROMPT: &str = "Answer the question as truthfully as possible, even if you don't have all the information to provide a perfect solution. If the answer is not apparent, provide guidance on how the user might rephrase the question or find more information.";

/// 语料目录配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CorpusConfig {
    /// 内容表目录（每个 .jsonl 文件一个类别）
    pub content_dir: PathBuf,
    /// 参考问答目录（.json 文件，含 entries 列表）
    pub curated_dir: PathBuf,
}

/// 对话模型配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LlmConfig {
    /// 后端类型: "openai" 或 "offline"
    pub backend: String,
    /// API 密钥
    pub api_key: String,
    /// API 基础地址
    pub base_url: String,
    /// 模型名称
    pub model: String,
    /// 采样温度
    pub temperature: f32,
    /// 回复 Token 上限
    pub max_tokens: Option<u32>,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 对话记忆窗口（保留的最近轮次数）
    pub memory_window: usize,
    /// 系统指令
    pub system_prompt: String,
}

/// 提示词构造配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptConfig {
    /// 每个匹配类别最多抽取的内容条数
    pub max_insights: usize,
    /// 抽样随机种子（为空时使用系统熵）
    pub sample_seed: Option<u64>,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
    /// 会话空闲多少秒后被清理，0 表示不清理
    pub session_idle_secs: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
    /// 日志文件目录
    pub log_dir: Option<PathBuf>,
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 语料配置
    pub corpus: CorpusConfig,
    /// 对话模型配置
    pub llm: LlmConfig,
    /// 提示词配置
    pub prompt: PromptConfig,
    /// 服务器配置
    pub server: ServerConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            corpus: CorpusConfig {
                content_dir: PathBuf::from("dataset"),
                curated_dir: PathBuf::from("curated"),
            },
            llm: LlmConfig {
                backend: "openai".into(),
                api_key: String::new(),
                base_url: "https://api.openai.com/v1".into(),
                model: "gpt-3.5-turbo".into(),
                temperature: 0.7,
                max_tokens: None,
                request_timeout_secs: 60,
                memory_window: DEFAULT_MEMORY_WINDOW,
                system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            },
            prompt: PromptConfig {
                max_insights: DEFAULT_MAX_INSIGHTS,
                sample_seed: None,
            },
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 8080,
                session_idle_secs: 3600,
            },
            logging: LoggingConfig {
                level: "info".into(),
                structured: false,
                log_dir: None,
            },
            app_name: "fitbot".into(),
            environment: "development".into(),
        }
    }

    /// 离线配置，不访问远程模型
    pub fn offline() -> Self {
        let mut config = Self::development();
        config.llm.backend = "offline".into();
        config
    }
}
