use thiserror::Error;

/// Typed failure from the remote inventory service.
///
/// Callers decide visibility: a scheduled refresh logs and retries next
/// tick, a user-initiated call surfaces the failure.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level or decoding failure from the HTTP stack.
    #[error("inventory service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("inventory service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}
