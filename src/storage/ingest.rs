//! 文本导入
//!
//! 把已提取的纯文本文档转换成内容表：每个非空行一条记录。

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::{AppError, Result};
use crate::models::content::ContentRow;
use crate::storage::corpus::{TABLE_EXTENSION, list_files};

/// 导入的源文本扩展名
pub const TEXT_EXTENSION: &str = "txt";

/// 按行切分文本，去掉首尾空白并丢弃空行
pub fn rows_from_text(file_name: &str, text: &str) -> Vec<ContentRow> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| ContentRow::new(file_name, line))
        .collect()
}

/// 写出 JSON Lines 内容表
pub fn write_table(path: &Path, rows: &[ContentRow]) -> Result<()> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// 导入目录下所有 .txt 文件，返回写出的表数量
pub fn ingest_directory(input: &Path, output: &Path) -> Result<usize> {
    fs::create_dir_all(output)?;

    let mut written = 0;
    for path in list_files(input, TEXT_EXTENSION)? {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AppError::corpus_format(&path, "file name is not valid UTF-8"))?;
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(file_name);

        let text = fs::read_to_string(&path)?;
        let rows = rows_from_text(file_name, &text);

        let target = output.join(format!("{stem}.{TABLE_EXTENSION}"));
        write_table(&target, &rows)?;
        info!(source = %path.display(), target = %target.display(), rows = rows.len(), "Ingested document");
        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::corpus::CorpusLoader;
    use tempfile::TempDir;

    #[test]
    fn test_rows_from_text_skips_blank_lines() {
        let rows = rows_from_text("plan.pdf", "  Warm up  \n\n\t\nStretch\r\n");
        assert_eq!(
            rows,
            vec![
                ContentRow::new("plan.pdf", "Warm up"),
                ContentRow::new("plan.pdf", "Stretch"),
            ]
        );
    }

    #[test]
    fn test_ingested_tables_load_back() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("cardio.txt"), "Running\nCycling\n").unwrap();
        fs::write(input.path().join("skip.md"), "not ingested").unwrap();

        let written = ingest_directory(input.path(), output.path()).unwrap();
        assert_eq!(written, 1);

        let table = CorpusLoader::load_content_tables(output.path()).unwrap();
        let rows = table.get("cardio").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].file_name, "cardio.txt");
        assert_eq!(rows[1].content, "Cycling");
    }
}
