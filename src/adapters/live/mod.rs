//! Live adapters for real external interactions.

pub mod jira;
pub mod xlsx;
