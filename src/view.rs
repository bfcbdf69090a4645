use url::Url;

use crate::model::{BookRecord, ReadingListSnapshot, Shelf};

pub const DESCRIPTION_PREVIEW_CHARS: usize = 150;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cover {
    Image(String),
    Placeholder,
}

/// What one book card displays. A pure function of the record and the
/// shelf it is rendered for; rebuilding it from the same inputs yields the
/// same card, so nothing here is a source of truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub title: String,
    pub author: Option<String>,
    pub cover: Cover,
    pub description: Option<String>,
    /// Default position of the shelf selector: the shelf the card sits on,
    /// or Want to Read in search context.
    pub shelf: Shelf,
}

impl CardView {
    pub fn new(book: &BookRecord, shelf: Option<Shelf>) -> Self {
        let cover = match book
            .cover_image
            .as_deref()
            .filter(|source| is_valid_image_source(source))
        {
            Some(source) => Cover::Image(source.to_owned()),
            None => Cover::Placeholder,
        };
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            cover,
            description: book.description.as_deref().map(preview),
            shelf: shelf.unwrap_or(Shelf::WantToRead),
        }
    }
}

/// Accepts an absolute URL or a `data:image/` URI carrying a base64
/// payload marker; anything else gets the placeholder.
pub fn is_valid_image_source(source: &str) -> bool {
    if let Some(rest) = source.strip_prefix("data:image/") {
        return rest.contains("base64,");
    }
    Url::parse(source).is_ok()
}

fn preview(description: &str) -> String {
    match description.char_indices().nth(DESCRIPTION_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &description[..cut]),
        None => description.to_owned(),
    }
}

pub fn render_library(snapshot: &ReadingListSnapshot) -> String {
    let mut out = String::new();
    for shelf in Shelf::ALL {
        let books = snapshot.books(shelf);
        out.push_str(&format!("{} ({})\n", shelf.label(), books.len()));
        if books.is_empty() {
            out.push_str("  No books saved\n");
        }
        for book in books {
            out.push_str(&render_card(&CardView::new(book, Some(shelf))));
        }
        out.push('\n');
    }
    out
}

pub fn render_card(card: &CardView) -> String {
    let mut out = String::new();
    match &card.author {
        Some(author) => out.push_str(&format!("  - {} by {author}\n", card.title)),
        None => out.push_str(&format!("  - {}\n", card.title)),
    }
    if let Some(description) = &card.description {
        out.push_str(&format!("      {description}\n"));
    }
    match &card.cover {
        Cover::Image(source) => out.push_str(&format!("      cover: {source}\n")),
        Cover::Placeholder => out.push_str("      (no cover)\n"),
    }
    out
}
