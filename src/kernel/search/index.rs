//! 内存中的全文索引
//!
//! 加载后只读，可通过 `Arc` 在多个搜索任务之间共享。

use super::cancel::CancellationToken;
use super::context::SearchContext;
use super::item::SearchItem;
use super::page::PageResolver;
use super::query::Query;
use super::result::SearchResult;
use super::tokenizer::Locale;
use super::xml;
use crate::kernel::services::ports::{LoadError, QueryError, SaveError};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    contexts: FxHashMap<u32, SearchContext>,
    items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOutcome {
    pub match_count: usize,
    pub results: BTreeSet<SearchResult>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Completed(QueryOutcome),
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub contexts: usize,
    pub items: usize,
    pub pages: usize,
}

impl SearchIndex {
    /// 由上下文和 item 批量构建索引
    ///
    /// 每个 item 的 `context_id` 必须指向某个上下文，否则整体失败。
    pub fn from_parts(
        contexts: impl IntoIterator<Item = SearchContext>,
        items: Vec<SearchItem>,
    ) -> Result<Self, LoadError> {
        let mut by_id: FxHashMap<u32, SearchContext> = FxHashMap::default();
        for context in contexts {
            let id = context.id();
            if by_id.insert(id, context).is_some() {
                return Err(LoadError::DuplicateContext(id));
            }
        }

        for item in &items {
            let Some(context) = by_id.get_mut(&item.context_id()) else {
                return Err(LoadError::UnknownContext {
                    word: item.word().to_string(),
                    context_id: item.context_id(),
                });
            };
            context.attach(item.clone());
        }

        Ok(Self {
            contexts: by_id,
            items,
        })
    }

    pub fn load<R: BufRead>(reader: R) -> Result<Self, LoadError> {
        let index = xml::read_index(reader)?;
        tracing::info!(
            contexts = index.contexts.len(),
            items = index.items.len(),
            "search index loaded"
        );
        Ok(index)
    }

    pub fn load_path(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        Self::load(BufReader::new(file))
    }

    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        xml::write_index(self, writer)
    }

    pub fn save_path(&self, path: &Path) -> Result<(), SaveError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn context(&self, id: u32) -> Option<&SearchContext> {
        self.contexts.get(&id)
    }

    pub fn contexts(&self) -> impl Iterator<Item = &SearchContext> {
        self.contexts.values()
    }

    pub fn items(&self) -> &[SearchItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        let pages: FxHashSet<&str> = self.items.iter().map(SearchItem::page_id).collect();
        IndexStats {
            contexts: self.contexts.len(),
            items: self.items.len(),
            pages: pages.len(),
        }
    }

    /// 同步查询：分词失败（空查询）时不扫描任何上下文
    pub fn query(
        &self,
        raw: &str,
        case_sensitive: bool,
        exact: bool,
        locale: &Locale,
        pages: &dyn PageResolver,
    ) -> Result<QueryOutcome, QueryError> {
        let query = Query::parse(raw, case_sensitive, exact, locale)?;
        match self.scan(&query, pages, &CancellationToken::new(), |_| {}) {
            ScanOutcome::Completed(outcome) => Ok(outcome),
            // 令牌从未被请求取消
            ScanOutcome::Cancelled => Ok(QueryOutcome::default()),
        }
    }

    /// 逐个上下文匹配
    ///
    /// 每个上下文之前检查一次取消；每个上下文之后上报进度百分比（仅在变化时上报）。
    /// 取消时丢弃已累积的结果。
    pub fn scan(
        &self,
        query: &Query,
        pages: &dyn PageResolver,
        cancel: &CancellationToken,
        mut on_progress: impl FnMut(u8),
    ) -> ScanOutcome {
        let total = self.contexts.len();
        if total == 0 {
            if cancel.requested() {
                return ScanOutcome::Cancelled;
            }
            on_progress(100);
            return ScanOutcome::Completed(QueryOutcome::default());
        }

        let mut outcome = QueryOutcome::default();
        let mut last_percent = None;
        for (scanned, context) in self.contexts.values().enumerate() {
            if cancel.requested() {
                return ScanOutcome::Cancelled;
            }
            if let Some(result) = context.find_matches(query, pages) {
                outcome.match_count += result.len();
                outcome.results.insert(result);
            }
            let percent = ((scanned + 1) * 100 / total) as u8;
            if last_percent != Some(percent) {
                last_percent = Some(percent);
                on_progress(percent);
            }
        }

        ScanOutcome::Completed(outcome)
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/search/index.rs"]
mod tests;
