//! 提示词构造
//!
//! 把历史、用户偏好、问题和匹配到的内容片段拼成一条提示词。

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::models::content::ContentTable;
use crate::models::preferences::UserPreferences;

/// 没有匹配内容时的占位文本
pub const NO_DATA_FOUND: &str = "No specific data found.";

/// 每个匹配类别默认抽取的片段数
pub const DEFAULT_MAX_INSIGHTS: usize = 3;

/// 历史摘要：逐条列出全部历史轮次，不做窗口截断
pub fn history_summary(history: &[(&str, &str)]) -> String {
    if history.is_empty() {
        return String::new();
    }

    let mut summary = String::from("You previously mentioned the following: ");
    for (past_query, past_response) in history {
        summary.push_str(&format!(
            "- You asked: {}. I responded: {}\n",
            past_query, past_response
        ));
    }
    summary
}

/// 偏好描述句
pub fn preferences_sentence(preferences: &UserPreferences) -> String {
    format!(
        "Your goals are {}, your experience level is {}, and you noted the following restrictions: {}.",
        preferences.goal, preferences.experience, preferences.restrictions
    )
}

/// 查找相关内容
///
/// 只有当小写后的问题与某类别中某行内容（小写后）完全相等时，该类别才算匹配；
/// 匹配的类别随机抽取至多 `max_per_category` 条内容。
pub fn relevant_insights<R: Rng + ?Sized>(
    query: &str,
    table: &ContentTable,
    rng: &mut R,
    max_per_category: usize,
) -> Vec<String> {
    let needle = query.to_lowercase();
    let mut insights = Vec::new();

    for (category, rows) in table.iter() {
        if !rows.iter().any(|row| row.content.to_lowercase() == needle) {
            continue;
        }

        debug!(category = %category, "Query matched content category");
        insights.extend(
            rows.choose_multiple(&mut *rng, max_per_category)
                .map(|row| row.content.clone()),
        );
    }

    insights
}

/// 构造完整提示词
pub fn compose_prompt<R: Rng + ?Sized>(
    query: &str,
    table: &ContentTable,
    history: &[(&str, &str)],
    preferences: &UserPreferences,
    rng: &mut R,
    max_per_category: usize,
) -> String {
    let insights = relevant_insights(query, table, &mut *rng, max_per_category);
    let relevant = if insights.is_empty() {
        debug!("No content category matched the query");
        NO_DATA_FOUND.to_string()
    } else {
        insights.join(", ")
    };

    format!(
        "You are a helpful fitness expert. {} {} Please answer the following question: {}.\n\
         Here are some potentially relevant insights from the dataset: {}",
        history_summary(history),
        preferences_sentence(preferences),
        query,
        relevant
    )
}
