use thiserror::Error;

/// Errors from key-value storage backends (used by the `KeyValueStorage` port).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage I/O error: {0}")]
    Io(String),

    #[error("corrupt storage contents: {0}")]
    Corrupt(String),
}

/// Errors related to the local sign-in session.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("failed to persist session: {0}")]
    Persist(String),
}

/// Errors from the remote chat backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

/// Errors surfaced by the chat submission flow.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,

    #[error(transparent)]
    Backend(#[from] BackendError),
}
