//! Headless search core (index/query/task).

pub mod search;
pub mod services;

pub use search::{
    CancellationToken, Locale, PageHandle, PageResolver, Query, QueryOutcome, SearchContext,
    SearchIndex, SearchItem, SearchResult,
};
pub use services::ports::{SearchMessage, TaskState};
