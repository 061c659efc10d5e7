//! Library Catalog Server
//!
//! REST JSON API for browsing a library catalog (books, authors, genres,
//! languages), listing borrowed copies and letting librarians renew loans
//! and manage authors.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
