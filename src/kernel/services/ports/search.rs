use crate::kernel::search::SearchResult;
use std::collections::BTreeSet;
use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

/// 索引加载失败：任何一种都会使整个索引不可用，不返回部分结果
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed index XML at byte {position}: {source}")]
    Xml {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },
    #[error("malformed attribute at byte {position}: {message}")]
    MalformedAttribute { position: usize, message: String },
    #[error("index document has no <search> root")]
    MissingRoot,
    #[error("index document ends inside <{0}>")]
    Truncated(&'static str),
    #[error("duplicate <search> root at byte {0}")]
    DuplicateRoot(usize),
    #[error("unexpected element <{name}> at byte {position}")]
    UnexpectedElement { name: String, position: usize },
    #[error("<{element}> at byte {position} is missing attribute `{attribute}`")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
        position: usize,
    },
    #[error("attribute `{attribute}` has invalid value {value:?} at byte {position}")]
    InvalidAttribute {
        attribute: &'static str,
        value: String,
        position: usize,
    },
    #[error("invalid entry: {0}")]
    InvalidEntry(#[from] ItemError),
    #[error("duplicate context id {0}")]
    DuplicateContext(u32),
    #[error("entry for word {word:?} references unknown context {context_id}")]
    UnknownContext { word: String, context_id: u32 },
    #[error("text outside <entry>/<context> at byte {position}")]
    StrayText { position: usize },
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("character {ch:?} in {field} cannot be written to XML")]
    InvalidChar { ch: char, field: &'static str },
}

/// 构造 SearchItem 时的不变量检查
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    #[error("context end {end} precedes context start {start}")]
    InvalidSpan { start: usize, end: usize },
    #[error("page id must not be empty")]
    EmptyPageId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("missing search term")]
    EmptyQuery,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown page: {page_id}")]
pub struct UnknownPageError {
    pub page_id: String,
}

impl UnknownPageError {
    pub fn new(page_id: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("search task failed: {0}")]
    TaskFailure(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl TaskState {
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            TaskState::Idle => 0,
            TaskState::Running => 1,
            TaskState::Completed => 2,
            TaskState::Failed => 3,
            TaskState::Cancelled => 4,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => TaskState::Running,
            2 => TaskState::Completed,
            3 => TaskState::Failed,
            4 => TaskState::Cancelled,
            _ => TaskState::Idle,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SearchMessage {
    Progress {
        search_id: u64,
        percent: u8,
    },
    Complete {
        search_id: u64,
        match_count: usize,
        results: BTreeSet<SearchResult>,
    },
    Cancelled {
        search_id: u64,
    },
    Failed {
        search_id: u64,
        error: SearchError,
    },
}

impl SearchMessage {
    pub fn search_id(&self) -> u64 {
        match self {
            SearchMessage::Progress { search_id, .. }
            | SearchMessage::Complete { search_id, .. }
            | SearchMessage::Cancelled { search_id }
            | SearchMessage::Failed { search_id, .. } => *search_id,
        }
    }

    /// 是否为任务的最终消息（之后不会再有该 search_id 的消息）
    pub fn is_final(&self) -> bool {
        !matches!(self, SearchMessage::Progress { .. })
    }
}
