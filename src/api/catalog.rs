//! Catalog browsing endpoints (public)

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorDetails},
        book::{BookDetails, BookShort},
        genre::Genre,
        language::Language,
        pagination::{Page, PageQuery},
    },
    services::catalog::CatalogCounts,
    AppState,
};

use super::PageParam;

/// Name of the cookie identifying an anonymous browsing session
pub const SESSION_COOKIE: &str = "sessionid";

/// Catalog home page data
#[derive(Serialize, ToSchema)]
pub struct IndexResponse {
    pub counts: CatalogCounts,
    /// Term used for `counts.num_featured`
    pub featured_term: String,
    /// Visits of this session before the current one
    pub num_visits: i64,
}

/// Catalog home page: record counts and the session's visit counter
#[utoipa::path(
    get,
    path = "/catalog/",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog summary", body = IndexResponse)
    )
)]
pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<IndexResponse>)> {
    let (jar, session_id) = match jar.get(SESSION_COOKIE) {
        Some(cookie) => {
            let id = cookie.value().to_string();
            (jar, id)
        }
        None => {
            let id = Uuid::new_v4().to_string();
            let cookie = Cookie::build((SESSION_COOKIE, id.clone()))
                .path("/")
                .http_only(true);
            (jar.add(cookie), id)
        }
    };

    let num_visits = state.services.sessions.record_visit(&session_id).await?;
    let counts = state.services.catalog.counts().await?;

    Ok((
        jar,
        Json(IndexResponse {
            counts,
            featured_term: state.services.catalog.featured_term().to_string(),
            num_visits,
        }),
    ))
}

/// List books by title
#[utoipa::path(
    get,
    path = "/catalog/books/",
    tag = "catalog",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of books"),
        (status = 404, description = "Invalid page", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    PageParam(page): PageParam,
) -> AppResult<Json<Page<BookShort>>> {
    let page = state.services.catalog.list_books(page).await?;
    Ok(Json(page))
}

/// Get book details with genres and copies
#[utoipa::path(
    get,
    path = "/catalog/books/{id}/",
    tag = "catalog",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// List authors by name
#[utoipa::path(
    get,
    path = "/catalog/authors/",
    tag = "catalog",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of authors"),
        (status = 404, description = "Invalid page", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    PageParam(page): PageParam,
) -> AppResult<Json<Page<Author>>> {
    let page = state.services.catalog.list_authors(page).await?;
    Ok(Json(page))
}

/// Get an author with their books
#[utoipa::path(
    get,
    path = "/catalog/authors/{id}/",
    tag = "catalog",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = AuthorDetails),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetails>> {
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(author))
}

#[utoipa::path(
    get,
    path = "/catalog/genres/",
    tag = "catalog",
    responses(
        (status = 200, description = "All genres", body = Vec<Genre>)
    )
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    Ok(Json(state.services.catalog.list_genres().await?))
}

#[utoipa::path(
    get,
    path = "/catalog/languages/",
    tag = "catalog",
    responses(
        (status = 200, description = "All languages", body = Vec<Language>)
    )
)]
pub async fn list_languages(State(state): State<AppState>) -> AppResult<Json<Vec<Language>>> {
    Ok(Json(state.services.catalog.list_languages().await?))
}
