use super::index::SearchIndex;
use super::item::SearchItem;
use super::page::PageHandle;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// 一个上下文内满足查询的所有 item
#[derive(Debug, Clone)]
pub struct SearchResult {
    page: PageHandle,
    context_id: u32,
    items: BTreeSet<SearchItem>,
}

impl SearchResult {
    pub(crate) fn new(page: PageHandle, context_id: u32, first: SearchItem) -> Self {
        let mut items = BTreeSet::new();
        items.insert(first);
        Self {
            page,
            context_id,
            items,
        }
    }

    pub(crate) fn push(&mut self, item: SearchItem) {
        self.items.insert(item);
    }

    pub fn page(&self) -> &PageHandle {
        &self.page
    }

    pub fn context_id(&self) -> u32 {
        self.context_id
    }

    pub fn items(&self) -> impl Iterator<Item = &SearchItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 将上下文文本切分为普通片段与命中片段，命中区间按起点升序
    ///
    /// 重叠区间合并，越界区间截断到文本末尾。上下文不在索引中时返回 `None`。
    pub fn highlight<'a>(&self, index: &'a SearchIndex) -> Option<Highlighted<'a>> {
        let text = index.context(self.context_id)?.text();
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_len = bounds.len() - 1;

        let mut spans: Vec<(usize, usize)> = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let start = item.context_start().min(char_len);
            let end = item.context_end().min(char_len);
            if start == end {
                continue;
            }
            match spans.last_mut() {
                Some(last) if start < last.1 => last.1 = last.1.max(end),
                _ => spans.push((start, end)),
            }
        }

        let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
        let mut cursor = 0usize;
        for (start, end) in spans {
            if start > cursor {
                segments.push(Segment::Plain(&text[bounds[cursor]..bounds[start]]));
            }
            segments.push(Segment::Match(&text[bounds[start]..bounds[end]]));
            cursor = end;
        }
        if cursor < char_len {
            segments.push(Segment::Plain(&text[bounds[cursor]..]));
        }

        Some(Highlighted { segments })
    }
}

impl PartialEq for SearchResult {
    fn eq(&self, other: &Self) -> bool {
        self.context_id == other.context_id && self.items == other.items
    }
}

impl Eq for SearchResult {}

impl PartialOrd for SearchResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchResult {
    /// 按上下文 id 排序，不是相关度排序
    fn cmp(&self, other: &Self) -> Ordering {
        self.context_id
            .cmp(&other.context_id)
            .then_with(|| self.items.iter().cmp(other.items.iter()))
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SearchResult[page={}, context={}, matches={}]",
            self.page.id(),
            self.context_id,
            self.items.len()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Match(&'a str),
}

impl<'a> Segment<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Segment::Plain(text) | Segment::Match(text) => *text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> Highlighted<'a> {
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    pub fn matches(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Match(text) => Some(*text),
            Segment::Plain(_) => None,
        })
    }

    /// 用调用方提供的标记包裹命中片段
    pub fn render(&self, open: &str, close: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Plain(text) => out.push_str(text),
                Segment::Match(text) => {
                    out.push_str(open);
                    out.push_str(text);
                    out.push_str(close);
                }
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/search/result.rs"]
mod tests;
