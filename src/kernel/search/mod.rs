//! 帮助文档全文搜索核心
//!
//! - SearchItem: 一次词出现位置
//! - SearchContext: 一段页面文本及其 item，提供匹配原语
//! - SearchIndex: 全部上下文 + item，负责加载/保存/查询
//! - SearchResult: 单个上下文内的命中集合，可生成高亮片段
//! - Query / tokenize: 查询分词与归一化

mod cancel;
mod context;
mod index;
mod item;
mod page;
mod query;
mod result;
mod tokenizer;
mod xml;

pub use cancel::CancellationToken;
pub use context::SearchContext;
pub use index::{IndexStats, QueryOutcome, ScanOutcome, SearchIndex};
pub use item::SearchItem;
pub use page::{IndexedPages, PageHandle, PageResolver};
pub use query::Query;
pub use result::{Highlighted, SearchResult, Segment};
pub use tokenizer::{tokenize, Locale};
