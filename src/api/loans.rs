//! Loan endpoints: borrowed lists, renewal form and returns

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book_instance::{BookInstance, LoanEntry},
        pagination::{Page, PageQuery},
        renewal::{RenewBookForm, RenewBookFormState},
        user::Permission,
    },
    services::loans::RenewalOutcome,
    AppState,
};

use super::{found, instance_id, today, AuthenticatedUser, PageParam, ALL_BORROWED_PATH};

/// Copies on loan to the current user
#[utoipa::path(
    get,
    path = "/catalog/mybooks/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Page of the caller's loans, by due date"),
        (status = 302, description = "Redirect to login")
    )
)]
pub async fn my_borrowed(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PageParam(page): PageParam,
) -> AppResult<Json<Page<LoanEntry>>> {
    let page = state
        .services
        .loans
        .list_borrowed_by(claims.user_id, page, today())
        .await?;
    Ok(Json(page))
}

/// Every copy on loan (librarians)
#[utoipa::path(
    get,
    path = "/catalog/borrowed/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Page of all loans, by due date"),
        (status = 302, description = "Redirect to login"),
        (status = 403, description = "Not a librarian", body = crate::error::ErrorResponse)
    )
)]
pub async fn all_borrowed(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PageParam(page): PageParam,
) -> AppResult<Json<Page<LoanEntry>>> {
    claims.require_any(&[Permission::CanMarkReturned, Permission::ChangeBookinstance])?;

    let page = state.services.loans.list_all_on_loan(page, today()).await?;
    Ok(Json(page))
}

/// Renewal form, pre-filled with the latest allowed date
#[utoipa::path(
    get,
    path = "/catalog/bookinstances/{id}/renew/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    responses(
        (status = 200, description = "Form state", body = RenewBookFormState),
        (status = 302, description = "Redirect to login"),
        (status = 403, description = "Missing can_mark_returned", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown book instance", body = crate::error::ErrorResponse)
    )
)]
pub async fn renewal_form(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<RenewBookFormState>> {
    claims.require(Permission::CanMarkReturned)?;
    let id = instance_id(path)?;

    let form = state.services.loans.renewal_form(id, today()).await?;
    Ok(Json(form))
}

/// Submit a new due date
#[utoipa::path(
    post,
    path = "/catalog/bookinstances/{id}/renew/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    request_body = RenewBookForm,
    responses(
        (status = 302, description = "Renewed, redirect to all borrowed books"),
        (status = 200, description = "Date missing, unparseable or out of range; form with errors", body = RenewBookFormState),
        (status = 403, description = "Missing can_mark_returned", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown book instance", body = crate::error::ErrorResponse)
    )
)]
pub async fn renew_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<RenewBookForm>, JsonRejection>,
) -> AppResult<Response> {
    claims.require(Permission::CanMarkReturned)?;
    let id = instance_id(path)?;

    // A body that does not deserialize is an empty form; its date field
    // then fails to parse and is reported like any other bad date.
    let form = body.map(|Json(form)| form).unwrap_or_else(|e| {
        tracing::debug!("Unreadable renewal form for {}: {}", id, e);
        RenewBookForm::default()
    });

    let outcome = state.services.loans.renew(id, &form, today()).await?;

    Ok(match outcome {
        RenewalOutcome::Renewed(_) => found(ALL_BORROWED_PATH),
        RenewalOutcome::Rejected(form) => Json(form).into_response(),
    })
}

/// Check a copy back in
#[utoipa::path(
    post,
    path = "/catalog/bookinstances/{id}/return/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    responses(
        (status = 200, description = "Copy is available again", body = BookInstance),
        (status = 403, description = "Missing can_mark_returned", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown book instance", body = crate::error::ErrorResponse),
        (status = 409, description = "Copy is not on loan", body = crate::error::ErrorResponse)
    )
)]
pub async fn mark_returned(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<BookInstance>> {
    claims.require(Permission::CanMarkReturned)?;
    let id = instance_id(path)?;

    let instance = state.services.loans.mark_returned(id).await?;
    Ok(Json(instance))
}
