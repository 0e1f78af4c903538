//! Routes 模块
//!
//! 定义 API 路由。

pub mod advice_routes;
pub mod query_routes;
pub mod session_routes;
