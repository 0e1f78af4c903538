//! 语料加载
//!
//! 从磁盘读取内容表（.jsonl）和参考问答（.json）。任何文件格式错误都会中止整个加载。

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::config::CorpusConfig;
use crate::error::{AppError, Result};
use crate::models::content::{ContentRow, ContentTable};
use crate::models::curated::{CuratedFile, CuratedSet};
use crate::models::Corpus;

/// 内容表文件扩展名
pub const TABLE_EXTENSION: &str = "jsonl";
/// 参考问答文件扩展名
pub const CURATED_EXTENSION: &str = "json";

/// 语料加载器
pub struct CorpusLoader;

impl CorpusLoader {
    /// 按配置加载全部语料
    pub fn load(config: &CorpusConfig) -> Result<Corpus> {
        let content = Self::load_content_tables(&config.content_dir)?;
        let curated = Self::load_curated_entries(&config.curated_dir)?;

        info!(
            categories = content.category_count(),
            rows = content.row_count(),
            curated_entries = curated.len(),
            "Corpus loaded"
        );

        Ok(Corpus::new(content, curated))
    }

    /// 读取目录下所有内容表，类别名取文件名（去掉扩展名）
    pub fn load_content_tables(dir: impl AsRef<Path>) -> Result<ContentTable> {
        let mut table = ContentTable::new();

        for path in list_files(dir.as_ref(), TABLE_EXTENSION)? {
            let category = file_stem(&path)?;
            let rows = read_table(&path)?;
            debug!(category = %category, rows = rows.len(), "Loaded content table");
            table.insert(category, rows);
        }

        Ok(table)
    }

    /// 读取目录下所有参考问答文件，拼接各文件 entries 列表
    pub fn load_curated_entries(dir: impl AsRef<Path>) -> Result<CuratedSet> {
        let mut curated = CuratedSet::default();

        for path in list_files(dir.as_ref(), CURATED_EXTENSION)? {
            let text = fs::read_to_string(&path)?;
            let file: CuratedFile =
                serde_json::from_str(&text).map_err(|e| AppError::corpus_format(&path, e))?;

            match file.entries {
                Some(entries) => {
                    debug!(path = %path.display(), entries = entries.len(), "Loaded curated file");
                    curated.extend(entries);
                }
                None => debug!(path = %path.display(), "Curated file has no entries"),
            }
        }

        Ok(curated)
    }
}

/// 解析单个 JSON Lines 内容表，空行跳过
pub fn read_table(path: &Path) -> Result<Vec<ContentRow>> {
    let text = fs::read_to_string(path)?;
    let mut rows = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row: ContentRow = serde_json::from_str(line)
            .map_err(|e| AppError::corpus_format(path, format!("line {}: {}", index + 1, e)))?;
        rows.push(row);
    }

    Ok(rows)
}

/// 列出目录下指定扩展名的文件，按文件名排序
pub(crate) fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AppError::Io(format!("{}: {}", dir.display(), e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| AppError::corpus_format(path, "file name is not valid UTF-8"))
}
