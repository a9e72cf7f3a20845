use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub case_sensitive: bool,
    pub exact: bool,
    /// BCP 47 风格的语言标签，例如 `en`、`zh-CN`
    pub locale: String,
    pub highlight_open: String,
    pub highlight_close: String,
    /// 命令行最多展示的结果条数
    pub max_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_path: Option<PathBuf>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            exact: false,
            locale: "en".to_string(),
            highlight_open: "[".to_string(),
            highlight_close: "]".to_string(),
            max_results: 50,
            index_path: None,
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
