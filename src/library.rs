use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::ReadingListBackend;
use crate::error::{ClientError, Result};
use crate::model::{BookId, NewBook, ReadingListSnapshot, Shelf};

/// View state of one library instance. Errors from individual move/remove
/// intents are transient and never leave `Ready`; only `load` itself can
/// end in `LoadError`.
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryState {
    Uninitialized,
    Loading,
    Ready(ReadingListSnapshot),
    LoadError(String),
}

/// Owns the in-memory reading list and keeps it consistent with the server.
///
/// Mutations are pessimistic: the snapshot changes only after the server
/// confirmed the operation, so a failure leaves local state exactly as it
/// was. At most one move/remove may be in flight per book; a conflicting
/// intent is rejected with `PendingOperation` instead of racing a stale
/// snapshot.
pub struct LibraryStore {
    backend: Arc<dyn ReadingListBackend>,
    inner: Mutex<Inner>,
}

struct Inner {
    state: LibraryState,
    pending: HashSet<BookId>,
}

impl LibraryStore {
    pub fn new(backend: Arc<dyn ReadingListBackend>) -> Self {
        Self {
            backend,
            inner: Mutex::new(Inner {
                state: LibraryState::Uninitialized,
                pending: HashSet::new(),
            }),
        }
    }

    pub fn state(&self) -> LibraryState {
        self.lock().state.clone()
    }

    pub fn snapshot(&self) -> Option<ReadingListSnapshot> {
        match &self.lock().state {
            LibraryState::Ready(snapshot) => Some(snapshot.clone()),
            _ => None,
        }
    }

    /// Fetches the full snapshot and replaces local state wholesale. The
    /// snapshot is never re-fetched behind the caller's back afterwards.
    pub async fn load(&self) -> Result<()> {
        self.lock().state = LibraryState::Loading;
        match self.backend.fetch().await {
            Ok(snapshot) => {
                self.lock().state = LibraryState::Ready(snapshot);
                Ok(())
            }
            Err(err) => {
                self.lock().state = LibraryState::LoadError(err.to_string());
                Err(err)
            }
        }
    }

    /// Moves a book between shelves. `from == to` is a no-op that makes no
    /// network call. The record keeps every field it had locally; the
    /// server response is not re-fetched.
    pub async fn move_book(&self, id: &BookId, from: Shelf, to: Shelf) -> Result<()> {
        if from == to {
            return Ok(());
        }
        self.begin(id, from)?;
        // The lock is not held while the request is in flight; `pending`
        // keeps conflicting intents out until the outcome lands.
        let outcome = self.backend.move_book(id, from, to).await;
        let mut inner = self.lock();
        inner.pending.remove(id);
        outcome?;
        if let LibraryState::Ready(snapshot) = &mut inner.state
            && let Some(index) = snapshot.books(from).iter().position(|b| b.id == *id)
        {
            let record = snapshot.books_mut(from).remove(index);
            snapshot.books_mut(to).push(record);
        }
        Ok(())
    }

    /// Removes a book from the named shelf, local state changing only on
    /// confirmed success.
    pub async fn remove_book(&self, id: &BookId, shelf: Shelf) -> Result<()> {
        self.begin(id, shelf)?;
        let outcome = self.backend.remove_book(id).await;
        let mut inner = self.lock();
        inner.pending.remove(id);
        outcome?;
        if let LibraryState::Ready(snapshot) = &mut inner.state
            && let Some(index) = snapshot.books(shelf).iter().position(|b| b.id == *id)
        {
            snapshot.books_mut(shelf).remove(index);
        }
        Ok(())
    }

    /// Saves a new book. Invoked from search context: the result belongs to
    /// a list this store does not own, so the snapshot is left alone.
    pub async fn add_book(&self, book: &NewBook, shelf: Shelf) -> Result<()> {
        self.backend.add_book(book, shelf).await
    }

    /// Validates a mutation against local state and marks the book as
    /// in flight. Runs entirely under the lock, before any network I/O.
    fn begin(&self, id: &BookId, shelf: Shelf) -> Result<()> {
        let mut inner = self.lock();
        let LibraryState::Ready(snapshot) = &inner.state else {
            return Err(ClientError::InconsistentState {
                id: id.clone(),
                shelf,
            });
        };
        if inner.pending.contains(id) {
            return Err(ClientError::PendingOperation(id.clone()));
        }
        if !snapshot.contains(id, shelf) {
            return Err(ClientError::InconsistentState {
                id: id.clone(),
                shelf,
            });
        }
        inner.pending.insert(id.clone());
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
