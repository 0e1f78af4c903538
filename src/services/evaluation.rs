//! 回答评估
//!
//! 用参考回答对模型回复打分：BLEU（4-gram，无平滑）和词错误率（WER）。

use std::collections::HashMap;

use tracing::debug;

use crate::models::curated::CuratedSet;
use crate::models::turn::Metric;

/// 找不到参考回答时使用的占位文本，它本身也会参与打分
pub const NO_REFERENCE: &str = "No reference available.";

/// BLEU 使用的最大 n-gram 阶数
pub const MAX_NGRAM: usize = 4;

/// 按空白切分
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// 同时计算 BLEU 与 WER
pub fn score(reference: &str, hypothesis: &str) -> Metric {
    let reference_tokens = tokenize(reference);
    let hypothesis_tokens = tokenize(hypothesis);

    Metric::new(
        bleu(&reference_tokens, &hypothesis_tokens),
        word_error_rate(&reference_tokens, &hypothesis_tokens),
    )
}

/// 句子级 BLEU
///
/// 1 到 4 阶 n-gram 截断精度的等权几何平均乘以简短惩罚。没有平滑：任一阶
/// 精度为 0（包括少于 4 个词的回复）时得分为 0。
pub fn bleu(reference: &[&str], hypothesis: &[&str]) -> f64 {
    if hypothesis.is_empty() {
        return 0.0;
    }

    let weight = 1.0 / MAX_NGRAM as f64;
    let mut log_sum = 0.0;

    for n in 1..=MAX_NGRAM {
        let (matched, total) = modified_precision(reference, hypothesis, n);
        if matched == 0 {
            return 0.0;
        }
        log_sum += weight * (matched as f64 / total as f64).ln();
    }

    brevity_penalty(reference.len(), hypothesis.len()) * log_sum.exp()
}

/// 截断 n-gram 精度，返回 (匹配数, 回复 n-gram 总数)，分母至少为 1
fn modified_precision(reference: &[&str], hypothesis: &[&str], n: usize) -> (usize, usize) {
    let hypothesis_counts = ngram_counts(hypothesis, n);
    let reference_counts = ngram_counts(reference, n);

    let matched = hypothesis_counts
        .iter()
        .map(|(gram, count)| (*count).min(reference_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    let total = hypothesis_counts.values().sum::<usize>().max(1);

    (matched, total)
}

fn ngram_counts<'a>(tokens: &'a [&'a str], n: usize) -> HashMap<&'a [&'a str], usize> {
    let mut counts = HashMap::new();
    if tokens.len() >= n {
        for gram in tokens.windows(n) {
            *counts.entry(gram).or_insert(0) += 1;
        }
    }
    counts
}

fn brevity_penalty(reference_len: usize, hypothesis_len: usize) -> f64 {
    if hypothesis_len > reference_len {
        1.0
    } else if hypothesis_len == 0 {
        0.0
    } else {
        (1.0 - reference_len as f64 / hypothesis_len as f64).exp()
    }
}

/// 词错误率：词级编辑距离除以参考词数
///
/// 参考为空时按 1 个词归一化，即返回回复的词数。
pub fn word_error_rate(reference: &[&str], hypothesis: &[&str]) -> f64 {
    // generic_levenshtein 要求 Sized 容器，切片先转成 Vec
    let edits = strsim::generic_levenshtein(&reference.to_vec(), &hypothesis.to_vec());
    edits as f64 / reference.len().max(1) as f64
}

/// 查找参考回答
///
/// 取第一条 `user_input` 以不区分大小写的子串方式包含问题的条目；找不到时
/// 返回 [`NO_REFERENCE`]。
pub fn resolve_reference(query: &str, curated: &CuratedSet) -> String {
    let needle = query.to_lowercase();

    match curated
        .entries()
        .iter()
        .find(|entry| entry.user_input.to_lowercase().contains(&needle))
    {
        Some(entry) => entry.chatbot_response.clone(),
        None => {
            debug!(query = %query, "No curated reference matched");
            NO_REFERENCE.to_string()
        }
    }
}
