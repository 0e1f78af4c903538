//! Fitbot - 健身知识问答机器人
//!
//! 结合本地语料与对话模型回答健身问题，并用人工整理的参考回答对每次回复
//! 计算 BLEU 与 WER。提供终端对话与 HTTP 两种入口。

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;
