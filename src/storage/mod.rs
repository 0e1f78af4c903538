//! 存储模块
//!
//! 基于文件的语料读写。

pub mod corpus;
pub mod ingest;

pub use corpus::CorpusLoader;
