use thiserror::Error;

use shelfwatch_api::ApiError;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A pause/resume request was refused because the setup lock is held.
    /// Informational, not a failure: the lock clears itself once every
    /// record is configured.
    #[error("automatic refresh is locked until all records are configured")]
    RefreshLocked,
}
