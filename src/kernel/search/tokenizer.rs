//! 查询分词
//!
//! - 默认：Unicode 词边界（UAX #29），丢弃标点与空白片段
//! - 中文 locale：连续汉字片段再交给 jieba 切词
//! - 结果去重，保持首次出现顺序

use compact_str::CompactString;
use jieba_rs::Jieba;
use once_cell::sync::Lazy;
use unicode_segmentation::UnicodeSegmentation;

static JIEBA: Lazy<Jieba> = Lazy::new(Jieba::new);

const RIGHT_SINGLE_QUOTE: char = '\u{2019}';

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    tag: CompactString,
}

impl Locale {
    pub fn new(tag: impl Into<CompactString>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// 主语言子标签，小写（`zh-TW` -> `zh`）
    pub fn language(&self) -> String {
        self.tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }

    fn segments_han_runs(&self) -> bool {
        self.language() == "zh"
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en")
    }
}

pub fn tokenize(text: &str, locale: &Locale) -> Vec<String> {
    let normalized = text.replace(RIGHT_SINGLE_QUOTE, "'");
    let mut tokens = Vec::new();

    if !locale.segments_han_runs() {
        for word in normalized.unicode_words() {
            push_unique(&mut tokens, word);
        }
        return tokens;
    }

    let mut han_run = String::new();
    for segment in normalized.split_word_bounds() {
        if is_han(segment) {
            han_run.push_str(segment);
            continue;
        }
        flush_han_run(&mut han_run, &mut tokens);
        if is_word(segment) {
            push_unique(&mut tokens, segment);
        }
    }
    flush_han_run(&mut han_run, &mut tokens);

    tokens
}

fn flush_han_run(run: &mut String, tokens: &mut Vec<String>) {
    if run.is_empty() {
        return;
    }
    for piece in JIEBA.cut(run.as_str(), false) {
        if is_word(piece) {
            push_unique(tokens, piece);
        }
    }
    run.clear();
}

fn push_unique(tokens: &mut Vec<String>, word: &str) {
    if !tokens.iter().any(|t| t == word) {
        tokens.push(word.to_string());
    }
}

fn is_word(segment: &str) -> bool {
    segment.chars().any(char::is_alphanumeric)
}

fn is_han(segment: &str) -> bool {
    !segment.is_empty()
        && segment.chars().all(|c| {
            matches!(c,
                '\u{4e00}'..='\u{9fff}' |
                '\u{3400}'..='\u{4dbf}' |
                '\u{f900}'..='\u{faff}'
            )
        })
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/search/tokenizer.rs"]
mod tests;
