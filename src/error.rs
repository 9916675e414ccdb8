use std::path::PathBuf;
use thiserror::Error;

/// Errors that make the dataset unusable. These are fatal to startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    #[error("No category columns found besides the identifier and total columns")]
    NoCategories,
}
