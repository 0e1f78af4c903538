use serde::{Deserialize, Serialize};

/// 参考问答条目
///
/// 人工整理的已知问答对，用作评估基准。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CuratedEntry {
    /// 用户问题
    pub user_input: String,
    /// 参考回答
    pub chatbot_response: String,
}

impl CuratedEntry {
    pub fn new(user_input: &str, chatbot_response: &str) -> Self {
        Self {
            user_input: user_input.to_string(),
            chatbot_response: chatbot_response.to_string(),
        }
    }
}

/// 参考问答文件结构
///
/// 没有 entries 字段的文件不贡献任何条目。
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CuratedFile {
    #[serde(default)]
    pub entries: Option<Vec<CuratedEntry>>,
}

/// 参考问答集合
///
/// 多个文件按加载顺序拼接成的扁平序列。
#[derive(Debug, Clone, Default)]
pub struct CuratedSet {
    entries: Vec<CuratedEntry>,
}

impl CuratedSet {
    pub fn new(entries: Vec<CuratedEntry>) -> Self {
        Self { entries }
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = CuratedEntry>) {
        self.entries.extend(entries);
    }

    pub fn entries(&self) -> &[CuratedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
