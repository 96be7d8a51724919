//! Error types for `jira-export`.
//!
//! Every failure ends the run. The variants only differ in how they were
//! reached and in the exit code they map to.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by port implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for `jira-export`.
#[derive(Debug, Error)]
pub enum Error {
    /// Command-line arguments were wrong, or help/version was requested.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// A required configuration key is absent.
    #[error("'{key}' must be set in the {} file.", path.display())]
    MissingConfig {
        /// The missing key, e.g. `jira.query`.
        key: &'static str,
        /// The configuration file that was read.
        path: PathBuf,
    },

    /// A configuration value is present but unusable.
    #[error("invalid value {value:?} for '{key}' in the {} file: {reason}", path.display())]
    InvalidConfig {
        /// The offending key.
        key: &'static str,
        /// The raw value found in the file.
        value: String,
        /// Why the value was rejected.
        reason: String,
        /// The configuration file that was read.
        path: PathBuf,
    },

    /// The configuration file could not be read or parsed.
    #[error("failed to read {}: {source}", path.display())]
    ConfigRead {
        /// The configuration file path.
        path: PathBuf,
        /// Underlying parse or I/O error.
        #[source]
        source: BoxError,
    },

    /// Talking to the issue tracker failed.
    #[error("{0}")]
    Transport(#[source] BoxError),

    /// The server returned fewer issues than requested before reaching the
    /// reported total, usually because it caps `maxResults` below the
    /// configured page size.
    #[error(
        "Jira returned {received} issues at offset {start_at} while {page_size} were requested \
         and {total} exist; lower 'jira.page_size' to at most {received}"
    )]
    TruncatedPage {
        /// Offset of the short page.
        start_at: usize,
        /// Issues actually returned.
        received: usize,
        /// Issues requested per page.
        page_size: usize,
        /// Total reported by the server.
        total: usize,
    },

    /// Writing the spreadsheet failed.
    #[error("{0}")]
    Write(#[source] BoxError),
}

impl Error {
    /// Process exit status for this error.
    ///
    /// Usage errors defer to clap (2, or 0 for `--help`/`--version`); all
    /// other failures exit with 1.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(err) => err.exit_code(),
            _ => 1,
        }
    }
}
