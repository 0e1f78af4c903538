//! Handlers 模块
//!
//! HTTP 请求处理程序。

pub mod advice_handler;
pub mod query_handler;
pub mod session_handler;

pub use advice_handler::*;
pub use query_handler::*;
pub use session_handler::*;
