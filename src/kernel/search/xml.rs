//! 索引文件读写
//!
//! ```text
//! <search>
//!   <entry node="PAGEID" context-start="N" context-end="N" context-id="N">WORD</entry>
//!   <context id="N">SNIPPET_TEXT</context>
//! </search>
//! ```
//!
//! 读取分两步：先收集所有 entry / context（文档中顺序任意），再统一挂接并校验
//! context-id。文本与属性值写入时转义、读取时反转义（包括 HTML 命名实体，如 `&nbsp;`）。
//! XML 1.0 不允许的字符（大部分 C0 控制字符、U+FFFE、U+FFFF）在写入时报错。

use super::context::SearchContext;
use super::index::SearchIndex;
use super::item::SearchItem;
use crate::kernel::services::ports::{LoadError, SaveError};
use quick_xml::escape::resolve_html5_entity;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::{BufRead, Write};
use std::str::FromStr;

const ROOT: &str = "search";
const ENTRY: &str = "entry";
const CONTEXT: &str = "context";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Root {
    NotSeen,
    Open,
    Closed,
}

#[derive(Debug)]
struct PendingEntry {
    page_id: String,
    context_id: u32,
    start: usize,
    end: usize,
    word: String,
}

#[derive(Debug)]
enum Open {
    Entry(PendingEntry),
    Context { id: u32, text: String },
}

struct Collector {
    root: Root,
    open: Option<Open>,
    contexts: Vec<SearchContext>,
    items: Vec<SearchItem>,
}

impl Collector {
    fn new() -> Self {
        Self {
            root: Root::NotSeen,
            open: None,
            contexts: Vec::new(),
            items: Vec::new(),
        }
    }

    fn start(&mut self, e: &BytesStart<'_>, position: usize, empty: bool) -> Result<(), LoadError> {
        let name = e.name();
        match name.as_ref() {
            b"search" => {
                if self.root != Root::NotSeen {
                    return Err(LoadError::DuplicateRoot(position));
                }
                self.root = if empty { Root::Closed } else { Root::Open };
                Ok(())
            }
            b"entry" if self.accepts_child() => {
                let entry = PendingEntry {
                    page_id: attribute(e, ENTRY, "node", position)?,
                    context_id: number(e, ENTRY, "context-id", position)?,
                    start: number(e, ENTRY, "context-start", position)?,
                    end: number(e, ENTRY, "context-end", position)?,
                    word: String::new(),
                };
                self.push_open(Open::Entry(entry), empty)
            }
            b"context" if self.accepts_child() => {
                let id = number(e, CONTEXT, "id", position)?;
                self.push_open(
                    Open::Context {
                        id,
                        text: String::new(),
                    },
                    empty,
                )
            }
            other => Err(LoadError::UnexpectedElement {
                name: String::from_utf8_lossy(other).into_owned(),
                position,
            }),
        }
    }

    fn accepts_child(&self) -> bool {
        self.root == Root::Open && self.open.is_none()
    }

    fn push_open(&mut self, open: Open, empty: bool) -> Result<(), LoadError> {
        if empty {
            self.finish(open)
        } else {
            self.open = Some(open);
            Ok(())
        }
    }

    fn end(&mut self, name: &[u8]) -> Result<(), LoadError> {
        if name == ROOT.as_bytes() {
            self.root = Root::Closed;
            return Ok(());
        }
        match self.open.take() {
            Some(open) => self.finish(open),
            None => Ok(()),
        }
    }

    fn text(&mut self, text: &str, position: usize) -> Result<(), LoadError> {
        match &mut self.open {
            Some(Open::Entry(entry)) => entry.word.push_str(text),
            Some(Open::Context { text: buf, .. }) => buf.push_str(text),
            // 元素之间只允许空白
            None if text.trim().is_empty() => {}
            None => return Err(LoadError::StrayText { position }),
        }
        Ok(())
    }

    fn finish(&mut self, open: Open) -> Result<(), LoadError> {
        match open {
            Open::Entry(entry) => {
                let item = SearchItem::new(
                    entry.word,
                    entry.page_id,
                    entry.context_id,
                    entry.start,
                    entry.end,
                )?;
                self.items.push(item);
            }
            Open::Context { id, text } => self.contexts.push(SearchContext::new(id, text)),
        }
        Ok(())
    }

    fn into_index(self) -> Result<SearchIndex, LoadError> {
        match self.root {
            Root::NotSeen => return Err(LoadError::MissingRoot),
            Root::Open => return Err(LoadError::Truncated(ROOT)),
            Root::Closed => {}
        }
        SearchIndex::from_parts(self.contexts, self.items)
    }
}

fn attribute(
    e: &BytesStart<'_>,
    element: &'static str,
    name: &'static str,
    position: usize,
) -> Result<String, LoadError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| LoadError::MalformedAttribute {
            position,
            message: err.to_string(),
        })?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr
                .unescape_value_with(resolve_html5_entity)
                .map_err(|source| LoadError::Xml { position, source })?;
            return Ok(value.into_owned());
        }
    }
    Err(LoadError::MissingAttribute {
        element,
        attribute: name,
        position,
    })
}

fn number<T: FromStr>(
    e: &BytesStart<'_>,
    element: &'static str,
    name: &'static str,
    position: usize,
) -> Result<T, LoadError> {
    let value = attribute(e, element, name, position)?;
    value
        .trim()
        .parse()
        .map_err(|_| LoadError::InvalidAttribute {
            attribute: name,
            value,
            position,
        })
}

pub(crate) fn read_index<R: BufRead>(source: R) -> Result<SearchIndex, LoadError> {
    let mut reader = Reader::from_reader(source);
    let mut buf = Vec::new();
    let mut collector = Collector::new();

    loop {
        let position = reader.buffer_position();
        match reader
            .read_event_into(&mut buf)
            .map_err(|source| LoadError::Xml { position, source })?
        {
            Event::Start(e) => collector.start(&e, position, false)?,
            Event::Empty(e) => collector.start(&e, position, true)?,
            Event::End(e) => collector.end(e.name().as_ref())?,
            Event::Text(e) => {
                let text = e
                    .unescape_with(resolve_html5_entity)
                    .map_err(|source| LoadError::Xml { position, source })?;
                collector.text(&text, position)?;
            }
            Event::CData(e) => collector.text(&String::from_utf8_lossy(&e), position)?,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = &collector.open {
        let element = match open {
            Open::Entry(_) => ENTRY,
            Open::Context { .. } => CONTEXT,
        };
        return Err(LoadError::Truncated(element));
    }
    collector.into_index()
}

pub(crate) fn write_index<W: Write>(index: &SearchIndex, out: W) -> Result<(), SaveError> {
    let mut writer = Writer::new(out);
    writer.write_event(Event::Start(BytesStart::new(ROOT)))?;

    for item in index.items() {
        check_chars(item.page_id(), "node")?;
        check_chars(item.word(), "entry")?;
        newline(&mut writer)?;
        let start = item.context_start().to_string();
        let end = item.context_end().to_string();
        let context_id = item.context_id().to_string();
        let mut entry = BytesStart::new(ENTRY);
        entry.push_attribute(("node", item.page_id()));
        entry.push_attribute(("context-start", start.as_str()));
        entry.push_attribute(("context-end", end.as_str()));
        entry.push_attribute(("context-id", context_id.as_str()));
        writer.write_event(Event::Start(entry))?;
        writer.write_event(Event::Text(BytesText::new(item.word())))?;
        writer.write_event(Event::End(BytesEnd::new(ENTRY)))?;
    }

    let mut contexts: Vec<&SearchContext> = index.contexts().collect();
    contexts.sort_by_key(|c| c.id());
    for context in contexts {
        check_chars(context.text(), "context")?;
        newline(&mut writer)?;
        let id = context.id().to_string();
        let mut start = BytesStart::new(CONTEXT);
        start.push_attribute(("id", id.as_str()));
        writer.write_event(Event::Start(start))?;
        writer.write_event(Event::Text(BytesText::new(context.text())))?;
        writer.write_event(Event::End(BytesEnd::new(CONTEXT)))?;
    }

    newline(&mut writer)?;
    writer.write_event(Event::End(BytesEnd::new(ROOT)))?;
    newline(&mut writer)?;
    Ok(())
}

fn check_chars(text: &str, field: &'static str) -> Result<(), SaveError> {
    match text.chars().find(|&c| !is_xml_char(c)) {
        Some(ch) => Err(SaveError::InvalidChar { ch, field }),
        None => Ok(()),
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{fffd}' | '\u{10000}'..='\u{10ffff}')
}

fn newline<W: Write>(writer: &mut Writer<W>) -> Result<(), SaveError> {
    writer.write_event(Event::Text(BytesText::new("\n")))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/search/xml.rs"]
mod tests;
