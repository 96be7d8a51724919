//! Paged issue search.
//!
//! The tracker caps how many issues one request may return, so the searcher
//! walks the result set page by page, advancing the offset by the page size,
//! until a short page or the reported total says there is nothing left. A
//! short page that falls below the reported total means the server capped
//! the page size, and the search fails rather than returning a partial set.

use crate::error::{Error, Result};
use crate::ports::{Issue, IssueSearchClient, SearchRequest};

/// Issues requested per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Fields requested per issue; the export needs nothing else.
pub const SEARCH_FIELDS: [&str; 2] = ["summary", "description"];

/// Retrieves the complete result set of a query.
pub struct IssueSearcher<'a> {
    client: &'a dyn IssueSearchClient,
    page_size: usize,
}

impl<'a> IssueSearcher<'a> {
    /// Creates a searcher using [`DEFAULT_PAGE_SIZE`].
    #[must_use]
    pub fn new(client: &'a dyn IssueSearchClient) -> Self {
        Self { client, page_size: DEFAULT_PAGE_SIZE }
    }

    /// Overrides the page size. Values below 1 are treated as 1.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Returns the configured page size.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Fetches every issue matching `jql`, in server order.
    ///
    /// Pages are requested one at a time. Nothing is retried: the first
    /// failing page aborts the whole search and no partial result is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] carrying the tracker's message if any page
    /// request fails, and [`Error::TruncatedPage`] if a page comes back short
    /// while the reported total says more issues remain.
    pub async fn search(&self, jql: &str) -> Result<Vec<Issue>> {
        let fields: Vec<String> = SEARCH_FIELDS.iter().map(ToString::to_string).collect();
        let mut issues = Vec::new();
        let mut start_at = 0;

        loop {
            let request = SearchRequest {
                jql: jql.to_string(),
                max_results: self.page_size,
                start_at,
                fields: fields.clone(),
            };
            let page = self.client.search(&request).await.map_err(Error::Transport)?;
            let received = page.issues.len();
            tracing::debug!(start_at, received, total = ?page.total, "fetched search page");

            if let Some(total) = page.total {
                if received < self.page_size && start_at + received < total {
                    return Err(Error::TruncatedPage {
                        start_at,
                        received,
                        page_size: self.page_size,
                        total,
                    });
                }
            }

            issues.extend(page.issues);
            start_at += self.page_size;

            let exhausted = page.total.is_some_and(|total| start_at >= total);
            if received < self.page_size || exhausted {
                break;
            }
        }

        tracing::info!(count = issues.len(), "search complete");
        Ok(issues)
    }
}
