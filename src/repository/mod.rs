//! Repository layer for database operations

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod users;

#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        author::{Author, CreateAuthor, UpdateAuthor},
        book::{Book, BookShort},
        book_instance::{BookInstance, LoanStatus},
        genre::Genre,
        language::Language,
        pagination::PageWindow,
        user::User,
    },
};

/// Storage operations the services rely on.
///
/// Listing methods return rows already filtered and ordered; callers pick
/// the page through a [`PageWindow`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Check that the store answers
    async fn ping(&self) -> AppResult<()>;

    // =========================================================================
    // GENRES / LANGUAGES
    // =========================================================================

    async fn count_genres(&self) -> AppResult<i64>;
    async fn list_genres(&self) -> AppResult<Vec<Genre>>;
    async fn list_languages(&self) -> AppResult<Vec<Language>>;

    // =========================================================================
    // BOOKS
    // =========================================================================

    async fn count_books(&self) -> AppResult<i64>;
    /// Books whose title contains `needle`, ignoring case
    async fn count_titles_containing(&self, needle: &str) -> AppResult<i64>;
    /// Ordered by title, then id
    async fn list_books(&self, window: PageWindow) -> AppResult<Vec<BookShort>>;
    async fn get_book(&self, id: i32) -> AppResult<Book>;
    async fn get_book_genres(&self, book_id: i32) -> AppResult<Vec<Genre>>;
    async fn list_books_by_author(&self, author_id: i32) -> AppResult<Vec<BookShort>>;

    // =========================================================================
    // AUTHORS
    // =========================================================================

    async fn count_authors(&self) -> AppResult<i64>;
    /// Ordered by last name, first name, then id
    async fn list_authors(&self, window: PageWindow) -> AppResult<Vec<Author>>;
    async fn get_author(&self, id: i32) -> AppResult<Author>;
    async fn create_author(&self, author: &CreateAuthor) -> AppResult<Author>;
    async fn update_author(&self, id: i32, author: &UpdateAuthor) -> AppResult<Author>;
    /// Books of the author are kept with their author unset
    async fn delete_author(&self, id: i32) -> AppResult<()>;

    // =========================================================================
    // BOOK INSTANCES
    // =========================================================================

    async fn count_book_instances(&self) -> AppResult<i64>;
    async fn count_instances_with_status(&self, status: LoanStatus) -> AppResult<i64>;
    /// Copies of one book, by due date
    async fn list_instances_of_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>>;
    /// On-loan copies, optionally restricted to one borrower
    async fn count_instances_on_loan(&self, borrower_id: Option<i32>) -> AppResult<i64>;
    /// On-loan copies ordered by due date (unset last), then id
    async fn list_instances_on_loan(
        &self,
        borrower_id: Option<i32>,
        window: PageWindow,
    ) -> AppResult<Vec<BookInstance>>;
    async fn get_book_instance(&self, id: Uuid) -> AppResult<BookInstance>;
    async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()>;
    /// Make the copy available again, clearing borrower and due date
    async fn mark_returned(&self, id: Uuid) -> AppResult<()>;

    // =========================================================================
    // USERS
    // =========================================================================

    async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn get_user(&self, id: i32) -> AppResult<User>;
}

/// PostgreSQL repository holding the connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub authors: authors::AuthorsRepository,
    pub book_instances: book_instances::BookInstancesRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            authors: authors::AuthorsRepository::new(pool.clone()),
            book_instances: book_instances::BookInstancesRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl CatalogStore for Repository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn count_genres(&self) -> AppResult<i64> {
        self.books.count_genres().await
    }

    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.books.list_genres().await
    }

    async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.books.list_languages().await
    }

    async fn count_books(&self) -> AppResult<i64> {
        self.books.count().await
    }

    async fn count_titles_containing(&self, needle: &str) -> AppResult<i64> {
        self.books.count_titles_containing(needle).await
    }

    async fn list_books(&self, window: PageWindow) -> AppResult<Vec<BookShort>> {
        self.books.list(window).await
    }

    async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.books.get_by_id(id).await
    }

    async fn get_book_genres(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        self.books.get_genres(book_id).await
    }

    async fn list_books_by_author(&self, author_id: i32) -> AppResult<Vec<BookShort>> {
        self.books.list_by_author(author_id).await
    }

    async fn count_authors(&self) -> AppResult<i64> {
        self.authors.count().await
    }

    async fn list_authors(&self, window: PageWindow) -> AppResult<Vec<Author>> {
        self.authors.list(window).await
    }

    async fn get_author(&self, id: i32) -> AppResult<Author> {
        self.authors.get_by_id(id).await
    }

    async fn create_author(&self, author: &CreateAuthor) -> AppResult<Author> {
        self.authors.create(author).await
    }

    async fn update_author(&self, id: i32, author: &UpdateAuthor) -> AppResult<Author> {
        self.authors.update(id, author).await
    }

    async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.authors.delete(id).await
    }

    async fn count_book_instances(&self) -> AppResult<i64> {
        self.book_instances.count().await
    }

    async fn count_instances_with_status(&self, status: LoanStatus) -> AppResult<i64> {
        self.book_instances.count_with_status(status).await
    }

    async fn list_instances_of_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        self.book_instances.list_for_book(book_id).await
    }

    async fn count_instances_on_loan(&self, borrower_id: Option<i32>) -> AppResult<i64> {
        self.book_instances.count_on_loan(borrower_id).await
    }

    async fn list_instances_on_loan(
        &self,
        borrower_id: Option<i32>,
        window: PageWindow,
    ) -> AppResult<Vec<BookInstance>> {
        self.book_instances.list_on_loan(borrower_id, window).await
    }

    async fn get_book_instance(&self, id: Uuid) -> AppResult<BookInstance> {
        self.book_instances.get_by_id(id).await
    }

    async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()> {
        self.book_instances.set_due_back(id, due_back).await
    }

    async fn mark_returned(&self, id: Uuid) -> AppResult<()> {
        self.book_instances.mark_returned(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.users.get_by_username(username).await
    }

    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.users.get_by_id(id).await
    }
}
