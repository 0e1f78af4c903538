//! 终端交互模块
//!
//! 命令行参数、偏好采集、提问循环和会话记录渲染。

pub mod preferences;
pub mod render;
pub mod repl;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use preferences::{PreferenceCollector, collect_interactive};
pub use render::render_transcript;
pub use repl::{Repl, ReplCommand};

/// Fitness knowledge chatbot
#[derive(Debug, Parser)]
#[command(name = "fitbot", version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Chat with the bot in the terminal (default)
    Chat,
    /// Serve the HTTP API
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Convert extracted text files into content tables
    Ingest {
        /// Directory containing *.txt files
        #[arg(long)]
        input: PathBuf,
        /// Output directory, defaults to the configured content directory
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// 未指定子命令时进入终端对话
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Chat)
    }
}
