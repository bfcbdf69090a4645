use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three reading-status shelves. Wire names are the snake_case serde
/// names; the camelCase aliases used by older clients are not accepted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Shelf {
    WantToRead,
    Reading,
    Read,
}

impl Shelf {
    /// Enumeration order: this is also the order sections render in.
    pub const ALL: [Shelf; 3] = [Shelf::WantToRead, Shelf::Reading, Shelf::Read];

    pub fn wire_name(self) -> &'static str {
        match self {
            Shelf::WantToRead => "want_to_read",
            Shelf::Reading => "reading",
            Shelf::Read => "read",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Shelf::WantToRead => "Want to Read",
            Shelf::Reading => "Currently Reading",
            Shelf::Read => "Read",
        }
    }
}

impl fmt::Display for Shelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque book identity. The server hands out either numeric or string ids;
/// both round-trip unchanged so a move request echoes exactly what `fetch`
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookId {
    Number(u64),
    Text(String),
}

impl FromStr for BookId {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.parse::<u64>() {
            Ok(n) => Ok(BookId::Number(n)),
            Err(_) => Ok(BookId::Text(raw.to_owned())),
        }
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookId::Number(n) => write!(f, "{n}"),
            BookId::Text(s) => f.write_str(s),
        }
    }
}

/// One saved book as it appears in a reading list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: BookId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(
        default,
        rename = "coverImage",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A book about to be saved for the first time. The server assigns the id
/// and decides what to do about duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(
        default,
        rename = "coverImage",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The complete reading list at a point in time. Shelf order is server
/// order; the client never re-sorts. A given id lives on at most one shelf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingListSnapshot {
    #[serde(default)]
    pub want_to_read: Vec<BookRecord>,
    #[serde(default)]
    pub reading: Vec<BookRecord>,
    #[serde(default)]
    pub read: Vec<BookRecord>,
}

impl ReadingListSnapshot {
    pub fn books(&self, shelf: Shelf) -> &[BookRecord] {
        match shelf {
            Shelf::WantToRead => &self.want_to_read,
            Shelf::Reading => &self.reading,
            Shelf::Read => &self.read,
        }
    }

    pub fn books_mut(&mut self, shelf: Shelf) -> &mut Vec<BookRecord> {
        match shelf {
            Shelf::WantToRead => &mut self.want_to_read,
            Shelf::Reading => &mut self.reading,
            Shelf::Read => &mut self.read,
        }
    }

    pub fn contains(&self, id: &BookId, shelf: Shelf) -> bool {
        self.books(shelf).iter().any(|book| book.id == *id)
    }

    /// First shelf in `Shelf::ALL` order that holds the id.
    pub fn locate(&self, id: &BookId) -> Option<Shelf> {
        Shelf::ALL
            .into_iter()
            .find(|shelf| self.contains(id, *shelf))
    }
}
