use super::item::SearchItem;
use super::page::PageResolver;
use super::query::Query;
use super::result::SearchResult;

/// 页面中的一段文本（段落粒度）及其中的所有词出现位置
#[derive(Debug, Clone)]
pub struct SearchContext {
    id: u32,
    text: String,
    items: Vec<SearchItem>,
}

impl SearchContext {
    pub fn new(id: u32, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn items(&self) -> &[SearchItem] {
        &self.items
    }

    pub(crate) fn attach(&mut self, item: SearchItem) {
        debug_assert_eq!(item.context_id(), self.id);
        self.items.push(item);
    }

    /// 用查询匹配本上下文的所有 item
    ///
    /// 第一次命中时才创建 `SearchResult`；页面无法解析的 item 被跳过。
    pub fn find_matches(&self, query: &Query, pages: &dyn PageResolver) -> Option<SearchResult> {
        let mut result: Option<SearchResult> = None;

        for item in &self.items {
            let Some(hit) = query.match_item(item) else {
                continue;
            };
            let page = match item.page(pages) {
                Ok(page) => page,
                Err(err) => {
                    tracing::debug!(
                        context_id = self.id,
                        page_id = %err.page_id,
                        word = item.word(),
                        "skip match on unknown page"
                    );
                    continue;
                }
            };
            match result.as_mut() {
                Some(result) => result.push(hit),
                None => result = Some(SearchResult::new(page, self.id, hit)),
            }
        }

        result
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/search/context.rs"]
mod tests;
