use thiserror::Error;

use crate::ClientError;

/// Errors the builder surfaces to its caller
///
/// Autosave failures never appear here; they are logged and swallowed.
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("Failed to load draft {quote_id}: {source}")]
    Bootstrap {
        quote_id: String,
        #[source]
        source: ClientError,
    },

    #[error("No draft identifier to load")]
    NothingToLoad,

    #[error("Failed to create draft: {0}")]
    Creation(#[source] ClientError),

    #[error("Trip type must be selected before the draft is created")]
    MissingTripType,

    #[error("No draft has been created yet")]
    NoDraft,

    #[error("Failed to save draft: {0}")]
    Save(#[source] ClientError),

    #[error("Failed to submit draft: {0}")]
    Submit(#[source] ClientError),

    #[error("Failed to delete draft: {0}")]
    Delete(#[source] ClientError),
}

pub type BuilderResult<T> = Result<T, BuilderError>;
