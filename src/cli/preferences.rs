//! 偏好采集
//!
//! 终端下用 dialoguer 的单选菜单和输入框；输入被重定向时退回编号菜单：
//! 空输入取第一个选项，无效输入重新提示，输入结束（EOF）时放弃采集。

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use dialoguer::{Input, Select, theme::ColorfulTheme};

use crate::error::Result;
use crate::models::preferences::{ExperienceLevel, FitnessGoal, UserPreferences};

const GOAL_QUESTION: &str = "What's your main fitness goal?";
const EXPERIENCE_QUESTION: &str = "What's your experience level?";
const RESTRICTIONS_QUESTION: &str = "Any injuries or limitations?";

/// 在终端中交互式采集偏好，用户按 Esc 取消选择时返回 None
pub fn collect_interactive() -> Result<Option<UserPreferences>> {
    let theme = ColorfulTheme::default();

    let Some(goal) = select(&theme, GOAL_QUESTION, &FitnessGoal::ALL)? else {
        return Ok(None);
    };
    let Some(experience) = select(&theme, EXPERIENCE_QUESTION, &ExperienceLevel::ALL)? else {
        return Ok(None);
    };
    let restrictions: String = Input::with_theme(&theme)
        .with_prompt(RESTRICTIONS_QUESTION)
        .allow_empty(true)
        .interact_text()?;

    Ok(Some(UserPreferences {
        goal,
        experience,
        restrictions,
    }))
}

fn select<T: Copy + Display>(
    theme: &ColorfulTheme,
    question: &str,
    options: &[T],
) -> Result<Option<T>> {
    let index = Select::with_theme(theme)
        .with_prompt(question)
        .items(options)
        .default(0)
        .interact_opt()?;
    Ok(option_at(options, index))
}

/// 菜单返回的下标换成选项，越界或取消时为 None
fn option_at<T: Copy>(options: &[T], index: Option<usize>) -> Option<T> {
    index.and_then(|index| options.get(index).copied())
}

pub struct PreferenceCollector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PreferenceCollector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// 依次采集目标、经验和限制，输入提前结束时返回 None
    pub fn collect(&mut self) -> Result<Option<UserPreferences>> {
        writeln!(self.output, "User Preferences")?;

        let Some(goal) = self.choose(GOAL_QUESTION, &FitnessGoal::ALL)? else {
            return Ok(None);
        };
        let Some(experience) =
            self.choose(EXPERIENCE_QUESTION, &ExperienceLevel::ALL)?
        else {
            return Ok(None);
        };

        write!(self.output, "{RESTRICTIONS_QUESTION} ")?;
        self.output.flush()?;
        let Some(restrictions) = self.read_line()? else {
            return Ok(None);
        };

        Ok(Some(UserPreferences {
            goal,
            experience,
            restrictions,
        }))
    }

    fn choose<T>(&mut self, question: &str, options: &[T]) -> Result<Option<T>>
    where
        T: Copy + Display + FromStr,
    {
        writeln!(self.output, "{question}")?;
        for (index, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {}", index + 1, option)?;
        }

        loop {
            write!(self.output, "Choose 1-{} [1]: ", options.len())?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let answer = line.trim();

            if answer.is_empty() {
                return Ok(options.first().copied());
            }
            if let Ok(number) = answer.parse::<usize>() {
                if (1..=options.len()).contains(&number) {
                    return Ok(Some(options[number - 1]));
                }
            } else if let Ok(option) = answer.parse::<T>() {
                return Ok(Some(option));
            }

            writeln!(
                self.output,
                "Please enter a number between 1 and {}.",
                options.len()
            )?;
        }
    }

    /// 读取一行并去掉行尾换行，EOF 返回 None
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}
