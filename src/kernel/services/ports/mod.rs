//! Service ports: data contracts shared between the search core and its hosts.

pub mod search;
pub mod settings;

pub use search::{
    ItemError, LoadError, QueryError, SaveError, SearchError, SearchMessage, TaskState,
    UnknownPageError,
};
pub use settings::SearchSettings;
