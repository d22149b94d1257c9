//! Error types for the storage seam

use thiserror::Error;

/// Errors raised by the lookup store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An entry without a barcode can never be looked up again.
    #[error("barcode must not be empty")]
    EmptyBarcode,

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
