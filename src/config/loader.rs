use crate::config::config::AppConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// 回退使用的 API 密钥环境变量
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 优先级（低到高）：
    /// 1. 内置默认值
    /// 2. ./fitbot.toml
    /// 3. FITBOT_ 前缀的环境变量（`__` 分隔嵌套字段）
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::load_from(default_config_path())
    }

    /// 从指定路径加载配置
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig, figment::Error> {
        let _ = dotenvy::dotenv();

        let mut config: AppConfig = Self::figment(path.as_ref()).extract()?;
        if config.llm.api_key.is_empty() {
            config.llm.api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
        }
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::development()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("FITBOT_").split("__"))
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        match config.llm.backend.as_str() {
            "openai" => {
                if config.llm.api_key.trim().is_empty() {
                    return Err(ConfigValidationError::MissingApiKey);
                }
            }
            "offline" => {}
            other => return Err(ConfigValidationError::UnknownBackend(other.to_string())),
        }

        if config.llm.memory_window == 0 {
            return Err(ConfigValidationError::InvalidMemoryWindow);
        }

        if config.llm.request_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if config.prompt.max_insights == 0 {
            return Err(ConfigValidationError::InvalidInsightLimit);
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("未配置 API 密钥（llm.api_key 或 {API_KEY_ENV}）")]
    MissingApiKey,

    #[error("未知的模型后端: {0}")]
    UnknownBackend(String),

    #[error("对话记忆窗口必须大于 0")]
    InvalidMemoryWindow,

    #[error("请求超时必须大于 0")]
    InvalidTimeout,

    #[error("内容抽样数量必须大于 0")]
    InvalidInsightLimit,
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("fitbot.toml")
}
