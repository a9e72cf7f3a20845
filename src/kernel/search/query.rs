use super::item::SearchItem;
use super::tokenizer::{tokenize, Locale};
use crate::kernel::services::ports::QueryError;
use std::borrow::Cow;
use std::cmp::Reverse;

/// 已分词、已按大小写规则归一化的查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    tokens: Vec<String>,
    case_sensitive: bool,
    exact: bool,
}

impl Query {
    pub fn parse(
        raw: &str,
        case_sensitive: bool,
        exact: bool,
        locale: &Locale,
    ) -> Result<Self, QueryError> {
        let text = normalize_case(raw, case_sensitive);
        let mut tokens = tokenize(&text, locale);
        if tokens.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        // 子串模式下每个 item 只取第一个命中的 token，长 token 优先
        if !exact && tokens.len() > 1 {
            tokens.sort_by_key(|t| Reverse(t.chars().count()));
        }
        Ok(Self {
            tokens,
            case_sensitive,
            exact,
        })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn exact(&self) -> bool {
        self.exact
    }

    /// 对单个 item 求匹配；子串命中时返回收窄到 token 位置的新 item
    pub fn match_item(&self, item: &SearchItem) -> Option<SearchItem> {
        let word = normalize_case(item.word(), self.case_sensitive);

        if self.exact {
            return self
                .tokens
                .iter()
                .any(|t| t.as_str() == &*word)
                .then(|| item.clone());
        }

        let token = self.tokens.iter().find(|t| word.contains(t.as_str()))?;
        if token.len() == word.len() {
            return Some(item.clone());
        }
        // 大小写折叠改变了字符数时无法映射回原词，保留原区间
        if word.chars().count() != item.word().chars().count() {
            return Some(item.clone());
        }
        let pos = word.find(token.as_str())?;
        let offset = word[..pos].chars().count();
        Some(item.clip(offset, token.chars().count()))
    }
}

fn normalize_case(text: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.to_lowercase())
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/search/query.rs"]
mod tests;
