use foodscout_off::OffError;
use thiserror::Error;

/// Failure of one list page fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A newer fetch superseded this one. Never shown to the user.
    #[error("fetch cancelled")]
    Cancelled,

    #[error(transparent)]
    Source(#[from] OffError),
}
