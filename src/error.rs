//! Error types for colflow.

use thiserror::Error;

/// Result type alias for colflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during layout processing.
///
/// Only [`Error::LayoutDetection`] is raised while a page is being
/// reordered, and the page processor always recovers from it by keeping the
/// extraction order.
#[derive(Error, Debug)]
pub enum Error {
    /// Column estimation, assignment or composition failed.
    #[error("Layout detection failed: {0}")]
    LayoutDetection(String),

    /// A configuration value is out of range.
    #[error("Invalid layout options: {0}")]
    InvalidOptions(String),

    /// The page worker pool could not be created.
    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Error::WorkerPool(err.to_string())
    }
}
