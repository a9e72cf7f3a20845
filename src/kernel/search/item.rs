use super::page::{PageHandle, PageResolver};
use crate::kernel::services::ports::{ItemError, UnknownPageError};
use compact_str::CompactString;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::ops::Range;

/// 一次被索引的词出现位置
///
/// `context_start..context_end` 是相对于所属上下文文本的半开区间，单位为 char。
/// 相等与排序只看 `(context_id, context_start, context_end)`。
#[derive(Debug, Clone)]
pub struct SearchItem {
    word: CompactString,
    context_start: usize,
    context_end: usize,
    page_id: CompactString,
    context_id: u32,
}

impl SearchItem {
    pub fn new(
        word: impl Into<CompactString>,
        page_id: impl Into<CompactString>,
        context_id: u32,
        context_start: usize,
        context_end: usize,
    ) -> Result<Self, ItemError> {
        if context_end < context_start {
            return Err(ItemError::InvalidSpan {
                start: context_start,
                end: context_end,
            });
        }
        let page_id = page_id.into();
        if page_id.is_empty() {
            return Err(ItemError::EmptyPageId);
        }
        Ok(Self {
            word: word.into(),
            context_start,
            context_end,
            page_id,
            context_id,
        })
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    pub fn context_id(&self) -> u32 {
        self.context_id
    }

    pub fn context_start(&self) -> usize {
        self.context_start
    }

    pub fn context_end(&self) -> usize {
        self.context_end
    }

    pub fn span(&self) -> Range<usize> {
        self.context_start..self.context_end
    }

    pub fn page(&self, pages: &dyn PageResolver) -> Result<PageHandle, UnknownPageError> {
        pages.resolve_page(&self.page_id)
    }

    /// 截取词内 `[offset, offset + len)`（char）得到新的出现位置
    ///
    /// 原 item 不变；结果区间总是落在原区间之内。
    pub fn clip(&self, offset: usize, len: usize) -> SearchItem {
        let context_start = (self.context_start + offset).min(self.context_end);
        let context_end = (context_start + len).min(self.context_end);
        let word: CompactString = self.word.chars().skip(offset).take(len).collect();
        SearchItem {
            word,
            context_start,
            context_end,
            page_id: self.page_id.clone(),
            context_id: self.context_id,
        }
    }

    fn key(&self) -> (u32, usize, usize) {
        (self.context_id, self.context_start, self.context_end)
    }
}

impl PartialEq for SearchItem {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for SearchItem {}

impl Hash for SearchItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for SearchItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/search/item.rs"]
mod tests;
