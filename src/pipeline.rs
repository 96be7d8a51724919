//! Search-then-write export pipeline.

use crate::error::{Error, Result};
use crate::ports::{IssueSearchClient, TableWriter};
use crate::row::{to_row, Row, HEADER};
use crate::search::IssueSearcher;

/// Where a pipeline run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Nothing has happened yet.
    Idle,
    /// Pages are being fetched from the tracker.
    Searching,
    /// Rows have been handed to the table writer.
    Exporting,
    /// Search and write both succeeded.
    Done,
    /// The search or the write failed. Terminal.
    Failed,
}

/// Runs one export: search, map each issue to a row, write the table once.
pub struct ExportPipeline<'a> {
    searcher: IssueSearcher<'a>,
    state: PipelineState,
}

impl<'a> ExportPipeline<'a> {
    /// Creates a pipeline that searches through `client`.
    #[must_use]
    pub fn new(client: &'a dyn IssueSearchClient) -> Self {
        Self { searcher: IssueSearcher::new(client), state: PipelineState::Idle }
    }

    /// Overrides the search page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.searcher = self.searcher.with_page_size(page_size);
        self
    }

    /// Current state of the pipeline.
    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Exports every issue matching `query` to `destination`.
    ///
    /// The writer is only invoked once the whole result set is in memory, so
    /// a failed search leaves the destination untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the search fails and [`Error::Write`]
    /// if the destination cannot be written.
    pub async fn run(&mut self, query: &str, destination: &dyn TableWriter) -> Result<usize> {
        self.transition(PipelineState::Searching);
        let issues = match self.searcher.search(query).await {
            Ok(issues) => issues,
            Err(err) => return Err(self.fail(err)),
        };

        let rows: Vec<Row> = issues.iter().map(to_row).collect();

        self.transition(PipelineState::Exporting);
        if let Err(err) = destination.write_table(&HEADER, &rows) {
            return Err(self.fail(Error::Write(err)));
        }

        self.transition(PipelineState::Done);
        Ok(rows.len())
    }

    fn transition(&mut self, next: PipelineState) {
        tracing::debug!(from = ?self.state, to = ?next, "pipeline state change");
        self.state = next;
    }

    fn fail(&mut self, err: Error) -> Error {
        tracing::warn!(state = ?self.state, error = %err, "export failed");
        self.transition(PipelineState::Failed);
        err
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::ports::{Issue, SearchFuture, SearchPage, SearchRequest};

    struct FixedTracker {
        result: std::result::Result<Vec<Issue>, String>,
    }

    impl IssueSearchClient for FixedTracker {
        fn search(&self, _request: &SearchRequest) -> SearchFuture<'_> {
            Box::pin(async move {
                match &self.result {
                    Ok(issues) => {
                        Ok(SearchPage { total: Some(issues.len()), issues: issues.clone() })
                    }
                    Err(message) => Err(message.clone().into()),
                }
            })
        }
    }

    #[derive(Default)]
    struct CapturingWriter {
        tables: Mutex<Vec<(Vec<String>, Vec<Row>)>>,
        fail: bool,
    }

    impl TableWriter for CapturingWriter {
        fn write_table(
            &self,
            header: &[&str],
            rows: &[Row],
        ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
            if self.fail {
                return Err("permission denied".into());
            }
            let header = header.iter().map(ToString::to_string).collect();
            self.tables.lock().unwrap().push((header, rows.to_vec()));
            Ok(())
        }
    }

    fn issue(key: &str, summary: &str, description: Option<&str>) -> Issue {
        Issue {
            key: key.to_string(),
            summary: summary.to_string(),
            description: description.map(String::from),
        }
    }

    fn sample_issues() -> Vec<Issue> {
        vec![
            issue("PROJ-1", "T1", None),
            issue("PROJ-2", "T2", Some("D\r\nE")),
            issue("PROJ-3", "T3", Some("")),
        ]
    }

    #[tokio::test]
    async fn exports_header_and_rows_in_search_order() {
        let tracker = FixedTracker { result: Ok(sample_issues()) };
        let writer = CapturingWriter::default();
        let mut pipeline = ExportPipeline::new(&tracker);
        assert_eq!(pipeline.state(), PipelineState::Idle);

        let count = pipeline.run("project = PROJ", &writer).await.unwrap();

        assert_eq!(count, 3);
        assert_eq!(pipeline.state(), PipelineState::Done);
        let tables = writer.tables.lock().unwrap();
        assert_eq!(tables.len(), 1, "exactly one write");
        let (header, rows) = &tables[0];
        assert_eq!(header, &["JIRA-ID", "Summary", "Description"]);
        let cells: Vec<[&str; 3]> = rows.iter().map(Row::cells).collect();
        assert_eq!(
            cells,
            vec![["PROJ-1", "T1", ""], ["PROJ-2", "T2", "D\nE"], ["PROJ-3", "T3", ""]]
        );
    }

    #[tokio::test]
    async fn empty_result_still_writes_header() {
        let tracker = FixedTracker { result: Ok(Vec::new()) };
        let writer = CapturingWriter::default();
        let mut pipeline = ExportPipeline::new(&tracker);

        assert_eq!(pipeline.run("project = EMPTY", &writer).await.unwrap(), 0);
        let tables = writer.tables.lock().unwrap();
        assert_eq!(tables.len(), 1);
        assert!(tables[0].1.is_empty());
    }

    #[tokio::test]
    async fn search_failure_skips_writer() {
        let tracker = FixedTracker { result: Err("Unauthorized (401)".to_string()) };
        let writer = CapturingWriter::default();
        let mut pipeline = ExportPipeline::new(&tracker);

        let err = pipeline.run("project = PROJ", &writer).await.unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
        assert!(err.to_string().contains("Unauthorized"));
        assert_eq!(pipeline.state(), PipelineState::Failed);
        assert!(writer.tables.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn write_failure_is_reported() {
        let tracker = FixedTracker { result: Ok(sample_issues()) };
        let writer = CapturingWriter { fail: true, ..CapturingWriter::default() };
        let mut pipeline = ExportPipeline::new(&tracker);

        let err = pipeline.run("project = PROJ", &writer).await.unwrap_err();

        assert!(matches!(err, Error::Write(_)));
        assert!(err.to_string().contains("permission denied"));
        assert_eq!(pipeline.state(), PipelineState::Failed);
    }
}
