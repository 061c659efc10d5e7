//! In-process router harness for handler tests

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::{
    config::AppConfig,
    models::user::{Permission, User},
    repository::{memory::MemoryStore, CatalogStore},
    services::{
        session::{MockSessionStore, SessionStore},
        users::hash_password,
        Services,
    },
    AppState,
};

use super::create_router;

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: Value,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    router: Router,
}

/// Session backend that reports every visit as the first one
pub fn first_visit_sessions() -> MockSessionStore {
    let mut sessions = MockSessionStore::new();
    sessions.expect_record_visit().returning(|_| Ok(0));
    sessions
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_sessions(first_visit_sessions())
    }

    pub fn with_sessions(sessions: MockSessionStore) -> Self {
        let store = Arc::new(MemoryStore::new());
        let (state, router) = build(store.clone(), Arc::new(sessions));
        Self {
            store,
            state,
            router,
        }
    }

    /// Router over an arbitrary store; `self.store` stays empty and unused
    pub fn with_store(catalog: Arc<dyn CatalogStore>) -> Self {
        let (state, router) = build(catalog, Arc::new(first_visit_sessions()));
        Self {
            store: Arc::new(MemoryStore::new()),
            state,
            router,
        }
    }

    /// Add an account with a real argon2 hash
    pub fn user(&self, username: &str, password: &str, permissions: &[Permission]) -> User {
        let hash = hash_password(password).unwrap();
        self.store.add_user(username, &hash, permissions)
    }

    pub fn token_for(&self, user: &User) -> String {
        self.state.services.users.create_token_for_user(user).unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, token, None, None).await
    }

    pub async fn get_with_cookie(&self, uri: &str, cookie: &str) -> TestResponse {
        self.send(Method::GET, uri, None, Some(cookie), None).await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, token, None, Some(body)).await
    }

    pub async fn put_json(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, token, None, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::DELETE, uri, token, None, None).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            json,
        }
    }
}

fn build(store: Arc<dyn CatalogStore>, sessions: Arc<dyn SessionStore>) -> (AppState, Router) {
    let config = AppConfig::default();
    let services = Services::new(store, sessions, &config);
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };
    (state.clone(), create_router(state))
}
