//! Engine error types.

use thiserror::Error;

use crate::backend::BackendError;

/// Errors reported by the public draw API.
#[derive(Error, Debug)]
pub enum DrawError {
    /// A caller-supplied value was degenerate or non-finite.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The graphics backend rejected an operation.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub type DrawResult<T> = Result<T, DrawError>;
