use pronas_client::ClientError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Upload triggered with no files selected.
    #[error("no files selected")]
    EmptySelection,

    #[error("required field left blank: {0}")]
    MissingField(&'static str),

    /// A submission from this controller is already in flight.
    #[error("a submission is already in flight")]
    Busy,

    #[error("view is not ready")]
    NotReady,

    #[error("no suggestion to apply")]
    NoSuggestion,

    /// The view was torn down before the response arrived; the response was dropped.
    #[error("view was torn down before the response arrived")]
    Cancelled,
}
