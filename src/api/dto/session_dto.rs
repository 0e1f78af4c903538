//! 会话 DTO
//!
//! 定义会话相关的请求和响应数据结构。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::preferences::{ExperienceLevel, FitnessGoal, UserPreferences};

/// 创建会话请求
///
/// 缺省字段取默认偏好（减脂、初学者、无限制）。
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateSessionRequest {
    /// 健身目标
    pub goal: Option<FitnessGoal>,
    /// 训练经验
    pub experience: Option<ExperienceLevel>,
    /// 饮食限制
    pub restrictions: Option<String>,
}

impl CreateSessionRequest {
    pub fn into_preferences(self) -> UserPreferences {
        let defaults = UserPreferences::default();
        UserPreferences {
            goal: self.goal.unwrap_or(defaults.goal),
            experience: self.experience.unwrap_or(defaults.experience),
            restrictions: self.restrictions.unwrap_or(defaults.restrictions),
        }
    }
}

/// 创建会话响应
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub preferences: UserPreferences,
}

/// 会话概要响应
#[derive(Debug, Serialize)]
pub struct SessionSummaryResponse {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub preferences: UserPreferences,
    /// 模型名称
    pub model: String,
    /// 已记录轮次数
    pub turns: usize,
    /// 平均 BLEU，无轮次时为 null
    pub mean_bleu: Option<f64>,
    /// 平均 WER，无轮次时为 null
    pub mean_wer: Option<f64>,
}

/// 删除会话响应
#[derive(Debug, Serialize)]
pub struct DeleteSessionResponse {
    pub id: String,
    /// 会话结束时的轮次数
    pub turns: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let request: CreateSessionRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.into_preferences(), UserPreferences::default());
    }

    #[test]
    fn test_create_request_snake_case_enums() {
        let request: CreateSessionRequest = serde_json::from_str(
            r#"{"goal":"build_muscle","experience":"advanced","restrictions":"no dairy"}"#,
        )
        .unwrap();
        let prefs = request.into_preferences();
        assert_eq!(prefs.goal, FitnessGoal::BuildMuscle);
        assert_eq!(prefs.experience, ExperienceLevel::Advanced);
        assert_eq!(prefs.restrictions, "no dairy");
    }
}
