//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;
pub mod language;
pub mod pagination;
pub mod renewal;
pub mod schema;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorDetails};
pub use book::{Book, BookDetails, BookShort};
pub use book_instance::{BookInstance, LoanEntry, LoanStatus};
pub use genre::Genre;
pub use language::Language;
pub use pagination::{Page, PageQuery, PageSpec, PageWindow};
pub use user::{Permission, User, UserClaims};
