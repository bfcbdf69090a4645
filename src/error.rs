use thiserror::Error;

use crate::model::{BookId, Shelf};

/// Errors surfaced by the client library. `Backend` carries the server's own
/// message verbatim; everything else is produced locally.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// No credential was available when the request was about to be sent.
    #[error("not signed in (set CLUBSHELF_TOKEN or run `clubshelf login`)")]
    Unauthenticated,

    /// The server rejected the request and said why.
    #[error("{0}")]
    Backend(String),

    /// The request never produced a usable response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The local snapshot disagrees with the caller about where a book is.
    /// Raised before any network call is made.
    #[error("book {id} is not on the {shelf} shelf")]
    InconsistentState { id: BookId, shelf: Shelf },

    /// An earlier move or remove for the same book has not resolved yet.
    #[error("a change for book {0} is still in flight")]
    PendingOperation(BookId),
}

pub type Result<T> = std::result::Result<T, ClientError>;
