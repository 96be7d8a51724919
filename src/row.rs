//! Mapping from issues to spreadsheet rows.

use crate::ports::Issue;

/// Column titles written above the exported rows.
pub const HEADER: [&str; 3] = ["JIRA-ID", "Summary", "Description"];

/// One exported issue: key, summary and normalized description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Issue key, copied verbatim.
    pub key: String,
    /// Issue summary, copied verbatim.
    pub summary: String,
    /// Description with CRLF line endings folded to LF; empty when absent.
    pub description: String,
}

impl Row {
    /// Returns the cells in column order.
    #[must_use]
    pub fn cells(&self) -> [&str; 3] {
        [&self.key, &self.summary, &self.description]
    }
}

impl From<&Issue> for Row {
    fn from(issue: &Issue) -> Self {
        to_row(issue)
    }
}

/// Maps an issue to its row.
#[must_use]
pub fn to_row(issue: &Issue) -> Row {
    Row {
        key: issue.key.clone(),
        summary: issue.summary.clone(),
        description: issue.description.as_deref().map(normalize_newlines).unwrap_or_default(),
    }
}

/// Replaces every `\r\n` with `\n`. Lone `\r` characters are left alone.
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}
