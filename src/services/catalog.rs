//! Catalog browsing service: counts, books, authors, genres, languages

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::CatalogConfig,
    error::AppResult,
    models::{
        author::{Author, AuthorDetails},
        book::{BookDetails, BookShort},
        book_instance::LoanStatus,
        genre::Genre,
        language::Language,
        pagination::{Page, PageSpec},
    },
    repository::CatalogStore,
};

/// Counts shown on the catalog home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CatalogCounts {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_genres: i64,
    /// Books whose title contains the featured term
    pub num_featured: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, config: CatalogConfig) -> Self {
        Self { store, config }
    }

    /// Check that storage is reachable
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }

    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        Ok(CatalogCounts {
            num_books: self.store.count_books().await?,
            num_instances: self.store.count_book_instances().await?,
            num_instances_available: self
                .store
                .count_instances_with_status(LoanStatus::Available)
                .await?,
            num_authors: self.store.count_authors().await?,
            num_genres: self.store.count_genres().await?,
            num_featured: self
                .store
                .count_titles_containing(&self.config.featured_term)
                .await?,
        })
    }

    pub fn featured_term(&self) -> &str {
        &self.config.featured_term
    }

    pub async fn list_books(&self, page: Option<i64>) -> AppResult<Page<BookShort>> {
        let total = self.store.count_books().await?;
        let spec = PageSpec::resolve(page, self.config.books_per_page, total)?;
        let books = self.store.list_books(spec.window()).await?;
        Ok(Page::new(books, spec))
    }

    /// Get a book with its author, genres and copies
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.store.get_book(id).await?;
        let author = match book.author_id {
            Some(author_id) => Some(self.store.get_author(author_id).await?),
            None => None,
        };
        let genres = self.store.get_book_genres(id).await?;
        let copies = self.store.list_instances_of_book(id).await?;
        Ok(BookDetails::new(book, author, genres, copies))
    }

    pub async fn list_authors(&self, page: Option<i64>) -> AppResult<Page<Author>> {
        let total = self.store.count_authors().await?;
        let spec = PageSpec::resolve(page, self.config.authors_per_page, total)?;
        let authors = self.store.list_authors(spec.window()).await?;
        Ok(Page::new(authors, spec))
    }

    /// Get an author with their books
    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = self.store.get_author(id).await?;
        let books = self.store.list_books_by_author(id).await?;
        Ok(AuthorDetails { author, books })
    }

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.store.list_genres().await
    }

    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.store.list_languages().await
    }
}
