//! Table writer port for serializing exported rows.

use crate::row::Row;

/// Writes a header and a sequence of rows to some tabular destination.
pub trait TableWriter: Send + Sync {
    /// Serializes the whole table in one go, replacing any previous output.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be created or written.
    fn write_table(
        &self,
        header: &[&str],
        rows: &[Row],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
