//! In-memory store used by service and handler tests

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::CatalogStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, CreateAuthor, UpdateAuthor},
        book::{Book, BookShort},
        book_instance::{BookInstance, LoanStatus},
        genre::Genre,
        language::Language,
        pagination::PageWindow,
        schema::{self, OnDelete},
        user::{Permission, User},
    },
};

#[derive(Default)]
struct Tables {
    genres: Vec<Genre>,
    languages: Vec<Language>,
    authors: Vec<Author>,
    books: Vec<Book>,
    book_genres: Vec<(i32, i32)>,
    instances: Vec<BookInstance>,
    users: Vec<User>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn book_short(&self, book: &Book) -> BookShort {
        BookShort {
            id: book.id,
            title: book.title.clone(),
            author_name: book
                .author_id
                .and_then(|id| self.authors.iter().find(|a| a.id == id))
                .map(|a| a.to_string()),
        }
    }

    fn with_title(&self, instance: &BookInstance) -> BookInstance {
        let mut instance = instance.clone();
        instance.book_title = instance
            .book_id
            .and_then(|id| self.books.iter().find(|b| b.id == id))
            .map(|b| b.title.clone());
        instance
    }

    fn on_loan(&self, borrower_id: Option<i32>) -> Vec<BookInstance> {
        let mut instances: Vec<BookInstance> = self
            .instances
            .iter()
            .filter(|i| i.is_on_loan())
            .filter(|i| borrower_id.map_or(true, |b| i.borrower_id == Some(b)))
            .map(|i| self.with_title(i))
            .collect();
        sort_by_due_back(&mut instances);
        instances
    }
}

/// Due date ascending, unset dates last, then id
fn sort_by_due_back(instances: &mut [BookInstance]) {
    instances.sort_by_key(|i| (i.due_back.is_none(), i.due_back, i.id));
}

fn window<T: Clone>(rows: &[T], window: PageWindow) -> Vec<T> {
    rows.iter()
        .skip(window.offset as usize)
        .take(window.limit as usize)
        .cloned()
        .collect()
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store poisoned")
    }

    pub fn add_genre(&self, name: &str) -> Genre {
        let mut t = self.tables();
        let genre = Genre {
            id: t.next_id(),
            name: name.to_string(),
        };
        t.genres.push(genre.clone());
        genre
    }

    pub fn add_language(&self, name: &str) -> Language {
        let mut t = self.tables();
        let language = Language {
            id: t.next_id(),
            name: name.to_string(),
        };
        t.languages.push(language.clone());
        language
    }

    pub fn add_author(&self, first_name: &str, last_name: &str) -> Author {
        let mut t = self.tables();
        let author = Author {
            id: t.next_id(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            date_of_birth: None,
            date_of_death: None,
        };
        t.authors.push(author.clone());
        author
    }

    pub fn add_book(&self, title: &str, author_id: Option<i32>, genre_ids: &[i32]) -> Book {
        let mut t = self.tables();
        let book = Book {
            id: t.next_id(),
            title: title.to_string(),
            summary: "My book summary".to_string(),
            isbn: "ABCDEFG".to_string(),
            author_id,
        };
        for genre_id in genre_ids {
            t.book_genres.push((book.id, *genre_id));
        }
        t.books.push(book.clone());
        book
    }

    pub fn add_instance(
        &self,
        book_id: i32,
        due_back: Option<NaiveDate>,
        status: Option<LoanStatus>,
        borrower_id: Option<i32>,
    ) -> BookInstance {
        let mut instance = BookInstance::new(Some(book_id), None, "Unlikely Imprint, 2016");
        instance.due_back = due_back;
        instance.status = status;
        instance.borrower_id = borrower_id;
        self.tables().instances.push(instance.clone());
        instance
    }

    /// Add a user; `password_hash` must already be hashed
    pub fn add_user(&self, username: &str, password_hash: &str, permissions: &[Permission]) -> User {
        let mut t = self.tables();
        let user = User {
            id: t.next_id(),
            username: username.to_string(),
            password: password_hash.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            permissions: permissions.to_vec(),
        };
        t.users.push(user.clone());
        user
    }

    pub fn instance(&self, id: Uuid) -> Option<BookInstance> {
        self.tables().instances.iter().find(|i| i.id == id).cloned()
    }

    pub fn book(&self, id: i32) -> Option<Book> {
        self.tables().books.iter().find(|b| b.id == id).cloned()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn count_genres(&self) -> AppResult<i64> {
        Ok(self.tables().genres.len() as i64)
    }

    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        let mut genres = self.tables().genres.clone();
        genres.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(genres)
    }

    async fn list_languages(&self) -> AppResult<Vec<Language>> {
        let mut languages = self.tables().languages.clone();
        languages.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(languages)
    }

    async fn count_books(&self) -> AppResult<i64> {
        Ok(self.tables().books.len() as i64)
    }

    async fn count_titles_containing(&self, needle: &str) -> AppResult<i64> {
        let needle = needle.to_lowercase();
        Ok(self
            .tables()
            .books
            .iter()
            .filter(|b| b.title.to_lowercase().contains(&needle))
            .count() as i64)
    }

    async fn list_books(&self, page: PageWindow) -> AppResult<Vec<BookShort>> {
        let t = self.tables();
        let mut books = t.books.clone();
        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        let books: Vec<BookShort> = books.iter().map(|b| t.book_short(b)).collect();
        Ok(window(&books, page))
    }

    async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.book(id)
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    async fn get_book_genres(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let t = self.tables();
        let mut genres: Vec<Genre> = t
            .book_genres
            .iter()
            .filter(|(b, _)| *b == book_id)
            .filter_map(|(_, g)| t.genres.iter().find(|genre| genre.id == *g).cloned())
            .collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(genres)
    }

    async fn list_books_by_author(&self, author_id: i32) -> AppResult<Vec<BookShort>> {
        let t = self.tables();
        let mut books: Vec<BookShort> = t
            .books
            .iter()
            .filter(|b| b.author_id == Some(author_id))
            .map(|b| t.book_short(b))
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(books)
    }

    async fn count_authors(&self) -> AppResult<i64> {
        Ok(self.tables().authors.len() as i64)
    }

    async fn list_authors(&self, page: PageWindow) -> AppResult<Vec<Author>> {
        let mut authors = self.tables().authors.clone();
        authors.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then(a.first_name.cmp(&b.first_name))
                .then(a.id.cmp(&b.id))
        });
        Ok(window(&authors, page))
    }

    async fn get_author(&self, id: i32) -> AppResult<Author> {
        self.tables()
            .authors
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    async fn create_author(&self, author: &CreateAuthor) -> AppResult<Author> {
        let mut t = self.tables();
        let created = Author {
            id: t.next_id(),
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
        };
        t.authors.push(created.clone());
        Ok(created)
    }

    async fn update_author(&self, id: i32, author: &UpdateAuthor) -> AppResult<Author> {
        let mut t = self.tables();
        let existing = t
            .authors
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))?;
        existing.first_name = author.first_name.clone();
        existing.last_name = author.last_name.clone();
        existing.date_of_birth = author.date_of_birth;
        existing.date_of_death = author.date_of_death;
        Ok(existing.clone())
    }

    async fn delete_author(&self, id: i32) -> AppResult<()> {
        let mut t = self.tables();
        let before = t.authors.len();
        t.authors.retain(|a| a.id != id);
        if t.authors.len() == before {
            return Err(AppError::NotFound(format!("Author with id {} not found", id)));
        }
        match schema::on_delete("books", "author_id") {
            Some(OnDelete::SetNull) => t
                .books
                .iter_mut()
                .filter(|b| b.author_id == Some(id))
                .for_each(|b| b.author_id = None),
            Some(OnDelete::Cascade) => t.books.retain(|b| b.author_id != Some(id)),
            None => {}
        }
        Ok(())
    }

    async fn count_book_instances(&self) -> AppResult<i64> {
        Ok(self.tables().instances.len() as i64)
    }

    async fn count_instances_with_status(&self, status: LoanStatus) -> AppResult<i64> {
        Ok(self
            .tables()
            .instances
            .iter()
            .filter(|i| i.status == Some(status))
            .count() as i64)
    }

    async fn list_instances_of_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let t = self.tables();
        let mut instances: Vec<BookInstance> = t
            .instances
            .iter()
            .filter(|i| i.book_id == Some(book_id))
            .map(|i| t.with_title(i))
            .collect();
        sort_by_due_back(&mut instances);
        Ok(instances)
    }

    async fn count_instances_on_loan(&self, borrower_id: Option<i32>) -> AppResult<i64> {
        Ok(self.tables().on_loan(borrower_id).len() as i64)
    }

    async fn list_instances_on_loan(
        &self,
        borrower_id: Option<i32>,
        page: PageWindow,
    ) -> AppResult<Vec<BookInstance>> {
        Ok(window(&self.tables().on_loan(borrower_id), page))
    }

    async fn get_book_instance(&self, id: Uuid) -> AppResult<BookInstance> {
        let t = self.tables();
        t.instances
            .iter()
            .find(|i| i.id == id)
            .map(|i| t.with_title(i))
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()> {
        let mut t = self.tables();
        let instance = t
            .instances
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))?;
        instance.due_back = Some(due_back);
        Ok(())
    }

    async fn mark_returned(&self, id: Uuid) -> AppResult<()> {
        let mut t = self.tables();
        let instance = t
            .instances
            .iter_mut()
            .find(|i| i.id == id && i.is_on_loan())
            .ok_or_else(|| AppError::Conflict(format!("Book instance {} is not on loan", id)))?;
        instance.status = Some(LoanStatus::Available);
        instance.due_back = None;
        instance.borrower_id = None;
        Ok(())
    }

    async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.tables()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }
}
