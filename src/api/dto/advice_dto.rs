//! 建议 DTO

use serde::{Deserialize, Serialize};

/// 训练计划查询参数
#[derive(Debug, Deserialize)]
pub struct WorkoutAdviceParams {
    pub age: u32,
    pub gender: String,
    pub lifestyle: String,
}

/// 饮食建议查询参数
#[derive(Debug, Deserialize)]
pub struct DietAdviceParams {
    pub age: u32,
    pub lifestyle: String,
}

/// 建议响应
#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    pub advice: String,
}
