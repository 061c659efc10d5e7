//! API handlers for the catalog REST endpoints

pub mod auth;
pub mod authors;
pub mod catalog;
pub mod health;
pub mod loans;
pub mod openapi;

#[cfg(test)]
pub(crate) mod test_support;

use axum::{
    async_trait,
    extract::{rejection::PathRejection, FromRequestParts, Path, Query},
    http::{
        header::{AUTHORIZATION, LOCATION},
        request::Parts,
        StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{pagination::PageQuery, user::UserClaims},
    AppState,
};

/// Where the renewal form sends librarians after a successful renewal
pub const ALL_BORROWED_PATH: &str = "/catalog/borrowed/";
/// Where author deletion lands
pub const AUTHORS_PATH: &str = "/catalog/authors/";

/// Extractor for authenticated user from JWT token.
///
/// Requests without credentials are redirected to the login page with a
/// `next` parameter; requests with a bad token are rejected with 401.
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(auth_header) = parts.headers.get(AUTHORIZATION) else {
            return Err(AppError::LoginRequired(format!(
                "{}?next={}",
                state.config.auth.login_url,
                parts.uri.path()
            )));
        };

        let auth_header = auth_header
            .to_str()
            .map_err(|_| AppError::Authentication("Invalid authorization header".to_string()))?;

        // Check for Bearer token
        let Some(token) = auth_header.strip_prefix("Bearer ") else {
            return Err(AppError::Authentication("Invalid authorization header format".to_string()));
        };

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// `?page=` of a listing. Values that are not a page number are an
/// invalid page (404), like pages out of range.
pub struct PageParam(pub Option<i64>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for PageParam {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::debug!("Bad page parameter: {}", e);
                AppError::NotFound("Invalid page".to_string())
            })?;
        Ok(PageParam(query.page))
    }
}

/// Book instance id from the URL. Handlers take the path as a `Result` so
/// the permission check runs first; an id that is not a UUID names no
/// instance.
pub fn instance_id(path: Result<Path<Uuid>, PathRejection>) -> AppResult<Uuid> {
    path.map(|Path(id)| id)
        .map_err(|e| AppError::NotFound(format!("Book instance not found: {}", e)))
}

/// `302 Found` to `location`
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

/// Current local date, the reference for due dates and renewals
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Catalog browsing
        .route("/catalog/", get(catalog::index))
        .route("/catalog/books/", get(catalog::list_books))
        .route("/catalog/books/:id/", get(catalog::get_book))
        .route("/catalog/genres/", get(catalog::list_genres))
        .route("/catalog/languages/", get(catalog::list_languages))
        // Authors
        .route(
            "/catalog/authors/",
            get(catalog::list_authors).post(authors::create_author),
        )
        .route(
            "/catalog/authors/:id/",
            get(catalog::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        // Loans
        .route("/catalog/mybooks/", get(loans::my_borrowed))
        .route("/catalog/borrowed/", get(loans::all_borrowed))
        .route(
            "/catalog/bookinstances/:id/renew/",
            get(loans::renewal_form).post(loans::renew_book),
        )
        .route("/catalog/bookinstances/:id/return/", post(loans::mark_returned))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
