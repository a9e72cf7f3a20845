use super::*;

fn en() -> Locale {
    Locale::default()
}

#[test]
fn test_splits_on_punctuation() {
    let tokens = tokenize("hello, world! (again)", &en());
    assert_eq!(tokens, vec!["hello", "world", "again"]);
}

#[test]
fn test_deduplicates_in_order() {
    let tokens = tokenize("b a b c a", &en());
    assert_eq!(tokens, vec!["b", "a", "c"]);
}

#[test]
fn test_smart_quote_normalized() {
    let tokens = tokenize("don\u{2019}t panic", &en());
    assert_eq!(tokens, vec!["don't", "panic"]);
}

#[test]
fn test_punctuation_only_is_empty() {
    assert!(tokenize("  ,.;!? -- ", &en()).is_empty());
    assert!(tokenize("", &en()).is_empty());
}

#[test]
fn test_keeps_numbers() {
    let tokens = tokenize("version 2.0 release", &en());
    assert!(tokens.contains(&"version".to_string()));
    assert!(tokens.contains(&"release".to_string()));
    assert!(tokens.iter().any(|t| t.contains('2')));
}

#[test]
fn test_locale_language() {
    assert_eq!(Locale::new("zh-TW").language(), "zh");
    assert_eq!(Locale::new("en_US").language(), "en");
    assert_eq!(Locale::new("DE").language(), "de");
}

#[test]
fn test_han_split_per_character_by_default() {
    let tokens = tokenize("搜索引擎", &en());
    assert_eq!(tokens, vec!["搜", "索", "引", "擎"]);
}

#[test]
fn test_han_runs_segmented_for_chinese_locale() {
    let tokens = tokenize("搜索引擎 test", &Locale::new("zh-CN"));
    assert!(tokens.contains(&"test".to_string()));
    assert!(tokens.iter().all(|t| !t.trim().is_empty()));
    // jieba 会把连续汉字切成多字词
    assert!(tokens.iter().any(|t| t.chars().count() > 1 && t != "test"));
}
