use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 内容行
///
/// 从源文档提取的一行文本，不带唯一标识，允许重复。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentRow {
    /// 源文件名
    pub file_name: String,
    /// 行内容
    pub content: String,
}

impl ContentRow {
    pub fn new(file_name: &str, content: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            content: content.to_string(),
        }
    }
}

/// 内容表
///
/// 类别名（源文件名去掉扩展名）到有序内容行的映射。加载后只读。
#[derive(Debug, Clone, Default)]
pub struct ContentTable {
    categories: BTreeMap<String, Vec<ContentRow>>,
}

impl ContentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加类别，同名类别会被覆盖
    pub fn insert(&mut self, category: impl Into<String>, rows: Vec<ContentRow>) {
        self.categories.insert(category.into(), rows);
    }

    pub fn get(&self, category: &str) -> Option<&[ContentRow]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// 按类别名顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ContentRow])> {
        self.categories
            .iter()
            .map(|(name, rows)| (name.as_str(), rows.as_slice()))
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn row_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl FromIterator<(String, Vec<ContentRow>)> for ContentTable {
    fn from_iter<T: IntoIterator<Item = (String, Vec<ContentRow>)>>(iter: T) -> Self {
        Self {
            categories: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_counts() {
        let mut table = ContentTable::new();
        assert!(table.is_empty());

        table.insert(
            "cardio",
            vec![
                ContentRow::new("cardio.pdf", "Running"),
                ContentRow::new("cardio.pdf", "Running"),
            ],
        );
        table.insert("diet", vec![ContentRow::new("diet.pdf", "Eat vegetables")]);

        assert_eq!(table.category_count(), 2);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.get("cardio").map(|rows| rows.len()), Some(2));
        assert!(table.get("yoga").is_none());
    }

    #[test]
    fn test_iteration_is_ordered_by_category() {
        let table: ContentTable = vec![
            ("strength".to_string(), Vec::new()),
            ("cardio".to_string(), Vec::new()),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["cardio", "strength"]);
    }
}
