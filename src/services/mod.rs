//! Business logic services

pub mod authors;
pub mod catalog;
pub mod loans;
pub mod redis;
pub mod session;
pub mod users;

use std::sync::Arc;

use crate::{config::AppConfig, repository::CatalogStore};

use self::session::SessionStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub authors: authors::AuthorsService,
    pub loans: loans::LoansService,
    pub users: users::UsersService,
    pub sessions: Arc<dyn SessionStore>,
}

impl Services {
    /// Create all services over the given store and session backend
    pub fn new(
        store: Arc<dyn CatalogStore>,
        sessions: Arc<dyn SessionStore>,
        config: &AppConfig,
    ) -> Self {
        Self {
            catalog: catalog::CatalogService::new(store.clone(), config.catalog.clone()),
            authors: authors::AuthorsService::new(store.clone()),
            loans: loans::LoansService::new(store.clone(), config.catalog.instances_per_page),
            users: users::UsersService::new(store, config.auth.clone()),
            sessions,
        }
    }
}
