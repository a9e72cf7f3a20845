//! 页面解析协作者
//!
//! 核心只持有不透明的 `PageHandle`，由宿主（导航树）负责把 page id 解析为页面。

use super::index::SearchIndex;
use crate::kernel::services::ports::UnknownPageError;
use compact_str::CompactString;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageHandle {
    id: CompactString,
    title: Option<String>,
}

impl PageHandle {
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self {
            id: id.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl fmt::Display for PageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{} ({})", title, self.id),
            None => f.write_str(&self.id),
        }
    }
}

pub trait PageResolver: Send + Sync {
    fn resolve_page(&self, page_id: &str) -> Result<PageHandle, UnknownPageError>;
}

impl PageResolver for FxHashMap<String, PageHandle> {
    fn resolve_page(&self, page_id: &str) -> Result<PageHandle, UnknownPageError> {
        self.get(page_id)
            .cloned()
            .ok_or_else(|| UnknownPageError::new(page_id))
    }
}

/// 以索引中出现过的 page id 作为页面集合，用于没有导航树的工具
#[derive(Debug, Clone, Default)]
pub struct IndexedPages {
    pages: FxHashSet<CompactString>,
}

impl IndexedPages {
    pub fn from_index(index: &SearchIndex) -> Self {
        let pages = index
            .items()
            .iter()
            .map(|item| CompactString::from(item.page_id()))
            .collect();
        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl PageResolver for IndexedPages {
    fn resolve_page(&self, page_id: &str) -> Result<PageHandle, UnknownPageError> {
        if self.pages.contains(page_id) {
            Ok(PageHandle::new(page_id))
        } else {
            Err(UnknownPageError::new(page_id))
        }
    }
}
