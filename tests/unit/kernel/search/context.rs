use super::*;
use crate::kernel::search::{Locale, PageHandle};
use crate::kernel::services::ports::UnknownPageError;
use rustc_hash::FxHashMap;

struct AllPages;

impl PageResolver for AllPages {
    fn resolve_page(&self, page_id: &str) -> Result<PageHandle, UnknownPageError> {
        Ok(PageHandle::new(page_id))
    }
}

fn context(id: u32, text: &str, words: &[(&str, &str, usize, usize)]) -> SearchContext {
    let mut context = SearchContext::new(id, text);
    for (word, page, start, end) in words {
        context.attach(SearchItem::new(*word, *page, id, *start, *end).unwrap());
    }
    context
}

fn query(raw: &str, case_sensitive: bool, exact: bool) -> Query {
    Query::parse(raw, case_sensitive, exact, &Locale::default()).unwrap()
}

#[test]
fn test_no_match_returns_none() {
    let ctx = context(1, "the quick fox", &[("quick", "p", 4, 9), ("fox", "p", 10, 13)]);
    assert!(ctx.find_matches(&query("wolf", false, false), &AllPages).is_none());
}

#[test]
fn test_exact_excludes_longer_words() {
    let ctx = context(
        1,
        "foo foobar Foo",
        &[("foo", "p", 0, 3), ("foobar", "p", 4, 10), ("Foo", "p", 11, 14)],
    );
    let result = ctx
        .find_matches(&query("foo", false, true), &AllPages)
        .unwrap();
    let words: Vec<&str> = result.items().map(|i| i.word()).collect();
    assert_eq!(words, vec!["foo", "Foo"]);

    let result = ctx
        .find_matches(&query("foo", true, true), &AllPages)
        .unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.items().next().unwrap().word(), "foo");
}

#[test]
fn test_all_matches_collected_into_one_result() {
    let ctx = context(
        3,
        "cat concatenate cats",
        &[("cat", "p", 0, 3), ("concatenate", "p", 4, 15), ("cats", "p", 16, 20)],
    );
    let result = ctx
        .find_matches(&query("cat", false, false), &AllPages)
        .unwrap();
    assert_eq!(result.context_id(), 3);
    let spans: Vec<_> = result.items().map(|i| i.span()).collect();
    assert_eq!(spans, vec![0..3, 7..10, 16..19]);
    // 存储的 item 不受截取影响
    assert_eq!(ctx.items()[1].span(), 4..15);
}

#[test]
fn test_unknown_page_items_skipped() {
    let mut pages: FxHashMap<String, PageHandle> = FxHashMap::default();
    pages.insert("known".to_string(), PageHandle::new("known"));

    let ctx = context(
        1,
        "fox fox",
        &[("fox", "missing", 0, 3), ("fox", "known", 4, 7)],
    );
    let result = ctx
        .find_matches(&query("fox", false, true), &pages)
        .unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.page().id(), "known");
    assert_eq!(result.items().next().unwrap().span(), 4..7);
}

#[test]
fn test_only_unknown_pages_yield_none() {
    let pages: FxHashMap<String, PageHandle> = FxHashMap::default();
    let ctx = context(1, "fox", &[("fox", "missing", 0, 3)]);
    assert!(ctx.find_matches(&query("fox", false, true), &pages).is_none());
}

#[test]
fn test_repeated_queries_are_independent() {
    let ctx = context(1, "concatenate", &[("concatenate", "p", 0, 11)]);
    let first = ctx
        .find_matches(&query("cat", false, false), &AllPages)
        .unwrap();
    let second = ctx
        .find_matches(&query("nate", false, false), &AllPages)
        .unwrap();
    assert_eq!(first.items().next().unwrap().span(), 3..6);
    assert_eq!(second.items().next().unwrap().span(), 7..11);
}
