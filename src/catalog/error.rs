use thiserror::Error;

/// Failure of a catalog operation. The display text is the message sent to clients.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("resource not found")]
    NotFound,

    #[error("bad request")]
    BadRequest,

    #[error("unprocessable")]
    Unprocessable,

    /// Question creation failed. Kept on 405 because existing clients key off that status.
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("internal server error")]
    Internal(#[from] sqlx::Error),
}
