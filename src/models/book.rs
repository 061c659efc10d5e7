//! Book model (a title, not a specific copy)

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{author::Author, book_instance::BookInstance, genre::Genre};

/// Full book model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub summary: String,
    /// 13 character ISBN
    pub isbn: String,
    /// Unset once the author has been deleted
    pub author_id: Option<i32>,
}

/// Short book representation for lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
    /// "Last, First" of the author, if any
    pub author_name: Option<String>,
}

/// Book with author, genres and copies, for the detail page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
    /// Genre names as shown in listings
    pub display_genre: String,
    pub copies: Vec<BookInstance>,
}

impl BookDetails {
    pub fn new(
        book: Book,
        author: Option<Author>,
        genres: Vec<Genre>,
        copies: Vec<BookInstance>,
    ) -> Self {
        let display_genre = display_genre(&genres);
        Self {
            book,
            author,
            genres,
            display_genre,
            copies,
        }
    }
}

/// Names of at most the first three genres, comma separated
pub fn display_genre(genres: &[Genre]) -> String {
    genres
        .iter()
        .take(3)
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
