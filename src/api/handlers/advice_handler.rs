use axum::{
    Json,
    extract::{Query, rejection::QueryRejection},
    response::IntoResponse,
};

use crate::{
    api::dto::advice_dto::{AdviceResponse, DietAdviceParams, WorkoutAdviceParams},
    error::AppError,
    services::advice,
};

/// 查询参数缺失或类型不对时按参数验证错误返回
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

pub async fn workout_advice(
    query: Result<Query<WorkoutAdviceParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let params = query_params(query)?;
    Ok(Json(AdviceResponse {
        advice: advice::workout_plan(params.age, &params.gender, &params.lifestyle),
    }))
}

pub async fn diet_advice(
    query: Result<Query<DietAdviceParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let params = query_params(query)?;
    Ok(Json(AdviceResponse {
        advice: advice::diet_tips(params.age, &params.lifestyle),
    }))
}
