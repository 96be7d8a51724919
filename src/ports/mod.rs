//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the export core and an external
//! system (the issue tracker, the spreadsheet file). Implementations live in
//! `src/adapters/`.

pub mod search;
pub mod table;

pub use search::{Issue, IssueSearchClient, SearchFuture, SearchPage, SearchRequest};
pub use table::TableWriter;
