use super::*;
use crate::kernel::services::ports::ItemError;

const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<search>
  <entry node="intro" context-start="10" context-end="13" context-id="1">fox</entry>
  <entry node="intro" context-start="9" context-end="12" context-id="2">dog</entry>
  <context id="1">the quick fox</context>
  <context id="2">the lazy dog</context>
</search>
"#;

fn load(xml: &str) -> Result<SearchIndex, LoadError> {
    read_index(xml.as_bytes())
}

#[test]
fn test_load_sample() {
    let index = load(SAMPLE).unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.items().len(), 2);
    assert_eq!(index.context(1).unwrap().text(), "the quick fox");
    let fox = &index.context(1).unwrap().items()[0];
    assert_eq!(fox.word(), "fox");
    assert_eq!(fox.page_id(), "intro");
    assert_eq!(fox.span(), 10..13);
}

#[test]
fn test_contexts_may_precede_entries() {
    let xml = r#"<search><context id="5">a b</context><entry node="p" context-start="0" context-end="1" context-id="5">a</entry></search>"#;
    let index = load(xml).unwrap();
    assert_eq!(index.context(5).unwrap().items().len(), 1);
}

#[test]
fn test_entities_unescaped() {
    let xml = r#"<search><entry node="a&amp;b" context-start="0" context-end="5" context-id="1">R&amp;D</entry><context id="1">R&amp;D &lt;team&gt; &quot;x&quot;</context></search>"#;
    let index = load(xml).unwrap();
    assert_eq!(index.context(1).unwrap().text(), "R&D <team> \"x\"");
    let item = &index.items()[0];
    assert_eq!(item.word(), "R&D");
    assert_eq!(item.page_id(), "a&b");
}

#[test]
fn test_empty_elements() {
    let xml = r#"<search><context id="1"/><entry node="p" context-start="0" context-end="0" context-id="1"/></search>"#;
    let index = load(xml).unwrap();
    assert_eq!(index.context(1).unwrap().text(), "");
    assert_eq!(index.items()[0].word(), "");
}

#[test]
fn test_unknown_context_fails_whole_load() {
    let xml = r#"<search><entry node="p" context-start="0" context-end="1" context-id="9">a</entry><context id="1">a</context></search>"#;
    assert!(matches!(
        load(xml),
        Err(LoadError::UnknownContext { context_id: 9, .. })
    ));
}

#[test]
fn test_duplicate_root() {
    let xml = "<search></search><search></search>";
    assert!(matches!(load(xml), Err(LoadError::DuplicateRoot(_))));
}

#[test]
fn test_unknown_tag() {
    let xml = r#"<search><page id="1"/></search>"#;
    let Err(LoadError::UnexpectedElement { name, .. }) = load(xml) else {
        panic!("expected unexpected element error");
    };
    assert_eq!(name, "page");
}

#[test]
fn test_entry_outside_root() {
    let xml = r#"<entry node="p" context-start="0" context-end="1" context-id="1">a</entry>"#;
    assert!(matches!(
        load(xml),
        Err(LoadError::UnexpectedElement { .. })
    ));
}

#[test]
fn test_nested_entry_rejected() {
    let xml = r#"<search><context id="1"><entry node="p" context-start="0" context-end="1" context-id="1">a</entry></context></search>"#;
    assert!(matches!(
        load(xml),
        Err(LoadError::UnexpectedElement { .. })
    ));
}

#[test]
fn test_missing_attribute() {
    let xml = r#"<search><entry node="p" context-start="0" context-id="1">a</entry></search>"#;
    assert!(matches!(
        load(xml),
        Err(LoadError::MissingAttribute {
            element: "entry",
            attribute: "context-end",
            ..
        })
    ));
}

#[test]
fn test_non_numeric_attribute() {
    let xml = r#"<search><context id="one">a</context></search>"#;
    let Err(LoadError::InvalidAttribute {
        attribute, value, ..
    }) = load(xml)
    else {
        panic!("expected invalid attribute error");
    };
    assert_eq!(attribute, "id");
    assert_eq!(value, "one");
}

#[test]
fn test_reversed_span_rejected() {
    let xml = r#"<search><entry node="p" context-start="5" context-end="2" context-id="1">a</entry><context id="1">abcdef</context></search>"#;
    assert!(matches!(
        load(xml),
        Err(LoadError::InvalidEntry(ItemError::InvalidSpan { start: 5, end: 2 }))
    ));
}

#[test]
fn test_empty_page_id_rejected() {
    let xml = r#"<search><entry node="" context-start="0" context-end="1" context-id="1">a</entry><context id="1">a</context></search>"#;
    assert!(matches!(
        load(xml),
        Err(LoadError::InvalidEntry(ItemError::EmptyPageId))
    ));
}

#[test]
fn test_missing_root() {
    assert!(matches!(load(""), Err(LoadError::MissingRoot)));
}

#[test]
fn test_truncated_document() {
    assert!(load("<search><context id=\"1\">abc").is_err());
}

#[test]
fn test_malformed_xml() {
    assert!(load("<search><context id=\"1\">abc</entry></search>").is_err());
}

#[test]
fn test_roundtrip_preserves_contexts_and_items() {
    let original = load(
        r#"<search>
<entry node="p&amp;1" context-start="0" context-end="3" context-id="2">&lt;a&gt;</entry>
<entry node="p2" context-start="4" context-end="9" context-id="1">quote</entry>
<entry node="p2" context-start="4" context-end="9" context-id="1">quote</entry>
<context id="1">it's "quoted" text</context>
<context id="2">&lt;a&gt; &amp; more
second line</context>
</search>"#,
    )
    .unwrap();

    let mut out = Vec::new();
    write_index(&original, &mut out).unwrap();
    let reloaded = read_index(out.as_slice()).unwrap();

    for context in original.contexts() {
        assert_eq!(
            reloaded.context(context.id()).unwrap().text(),
            context.text()
        );
    }
    assert_eq!(reloaded.len(), original.len());

    let tuples = |index: &SearchIndex| {
        let mut v: Vec<(String, u32, usize, usize, String)> = index
            .items()
            .iter()
            .map(|i| {
                (
                    i.page_id().to_string(),
                    i.context_id(),
                    i.context_start(),
                    i.context_end(),
                    i.word().to_string(),
                )
            })
            .collect();
        v.sort();
        v
    };
    assert_eq!(tuples(&reloaded), tuples(&original));
    assert_eq!(reloaded.items().len(), 3);
}

#[test]
fn test_html_named_entities_unescaped() {
    let xml = r#"<search><entry node="caf&eacute;" context-start="0" context-end="3" context-id="1">a&nbsp;b</entry><context id="1">a&nbsp;b &#233; &copy;</context></search>"#;
    let index = load(xml).unwrap();
    assert_eq!(index.context(1).unwrap().text(), "a\u{a0}b é ©");
    let item = &index.items()[0];
    assert_eq!(item.word(), "a\u{a0}b");
    assert_eq!(item.page_id(), "café");
}

#[test]
fn test_unknown_entity_rejected() {
    let xml = r#"<search><context id="1">a&bogus;b</context></search>"#;
    assert!(matches!(load(xml), Err(LoadError::Xml { .. })));
}

#[test]
fn test_text_after_root_rejected() {
    assert!(matches!(
        load("<search></search>junk"),
        Err(LoadError::StrayText { .. })
    ));
    assert!(matches!(
        load("junk<search></search>"),
        Err(LoadError::StrayText { .. })
    ));
}

#[test]
fn test_text_between_elements_rejected() {
    let xml = r#"<search><context id="1">a</context>stray</search>"#;
    assert!(matches!(load(xml), Err(LoadError::StrayText { .. })));
}

#[test]
fn test_whitespace_around_root_accepted() {
    let index = load("\n  <search>\n\t</search>\n\n").unwrap();
    assert!(index.is_empty());
}

#[test]
fn test_control_char_rejected_on_save() {
    let index = SearchIndex::from_parts([SearchContext::new(1, "a\u{1}b")], Vec::new()).unwrap();
    let mut out = Vec::new();
    let err = write_index(&index, &mut out).unwrap_err();
    assert!(matches!(
        err,
        SaveError::InvalidChar {
            ch: '\u{1}',
            field: "context"
        }
    ));
}

#[test]
fn test_control_char_in_word_rejected_on_save() {
    let index = SearchIndex::from_parts(
        [SearchContext::new(1, "ab")],
        vec![SearchItem::new("a\u{b}", "p", 1, 0, 2).unwrap()],
    )
    .unwrap();
    let mut out = Vec::new();
    assert!(matches!(
        write_index(&index, &mut out),
        Err(SaveError::InvalidChar { field: "entry", .. })
    ));
}

#[test]
fn test_tab_and_newline_written() {
    let index =
        SearchIndex::from_parts([SearchContext::new(1, "a\tb\r\nc")], Vec::new()).unwrap();
    let mut out = Vec::new();
    write_index(&index, &mut out).unwrap();
    assert!(read_index(out.as_slice()).is_ok());
}
