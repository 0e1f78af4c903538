//! 提问循环
//!
//! 每行输入作为一次提问送入会话，处理后重新渲染完整记录。`/quit` 或 EOF 结束，
//! `/plan` 与 `/diet` 直接输出模板建议，不进入对话。

use std::io::{BufRead, Write};

use tracing::debug;

use crate::cli::render::render_transcript;
use crate::error::Result;
use crate::models::Corpus;
use crate::services::advice;
use crate::services::session::ChatSession;

const PLAN_USAGE: &str = "Usage: /plan AGE GENDER LIFESTYLE";
const DIET_USAGE: &str = "Usage: /diet AGE LIFESTYLE";

/// 一行输入的解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// 空行，忽略
    Skip,
    Quit,
    Plan {
        age: u32,
        gender: String,
        lifestyle: String,
    },
    Diet {
        age: u32,
        lifestyle: String,
    },
    /// 命令参数有误，附带用法说明
    Usage(&'static str),
    /// 普通提问，保留原文
    Query(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ReplCommand::Skip;
        }

        let mut words = trimmed.split_whitespace();
        match words.next() {
            Some("/quit") => ReplCommand::Quit,
            Some("/plan") => {
                let args: Vec<&str> = words.collect();
                match args.as_slice() {
                    [age, gender, lifestyle] => match age.parse() {
                        Ok(age) => ReplCommand::Plan {
                            age,
                            gender: gender.to_string(),
                            lifestyle: lifestyle.to_string(),
                        },
                        Err(_) => ReplCommand::Usage(PLAN_USAGE),
                    },
                    _ => ReplCommand::Usage(PLAN_USAGE),
                }
            }
            Some("/diet") => {
                let args: Vec<&str> = words.collect();
                match args.as_slice() {
                    [age, lifestyle] => match age.parse() {
                        Ok(age) => ReplCommand::Diet {
                            age,
                            lifestyle: lifestyle.to_string(),
                        },
                        Err(_) => ReplCommand::Usage(DIET_USAGE),
                    },
                    _ => ReplCommand::Usage(DIET_USAGE),
                }
            }
            _ => ReplCommand::Query(line.trim_end_matches(['\n', '\r']).to_string()),
        }
    }
}

pub struct Repl<'a, R, W> {
    input: R,
    output: W,
    corpus: &'a Corpus,
}

impl<'a, R: BufRead, W: Write> Repl<'a, R, W> {
    pub fn new(input: R, output: W, corpus: &'a Corpus) -> Self {
        Self {
            input,
            output,
            corpus,
        }
    }

    /// 运行到 `/quit` 或输入结束
    pub async fn run(&mut self, session: &mut ChatSession) -> Result<()> {
        writeln!(
            self.output,
            "Ask me about workouts or fitness... (/plan, /diet, /quit)"
        )?;

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                debug!("Input closed, leaving query loop");
                break;
            }

            match ReplCommand::parse(&line) {
                ReplCommand::Skip => continue,
                ReplCommand::Quit => break,
                ReplCommand::Usage(usage) => writeln!(self.output, "{usage}")?,
                ReplCommand::Plan {
                    age,
                    gender,
                    lifestyle,
                } => writeln!(
                    self.output,
                    "{}",
                    advice::workout_plan(age, &gender, &lifestyle)
                )?,
                ReplCommand::Diet { age, lifestyle } => {
                    writeln!(self.output, "{}", advice::diet_tips(age, &lifestyle))?
                }
                ReplCommand::Query(query) => {
                    writeln!(self.output, "Thinking...")?;
                    session.process_query(self.corpus, &query).await;
                    write!(self.output, "{}", render_transcript(session.transcript()))?;
                }
            }
        }

        Ok(())
    }
}
