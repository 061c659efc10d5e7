//! Page-number pagination for catalog listings

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// `?page=` query parameter
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams, ToSchema)]
pub struct PageQuery {
    /// Page number, starting at 1 (default: 1)
    pub page: Option<i64>,
}

/// Rows to fetch for one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: i64,
    pub limit: i64,
}

/// Position of a requested page within a collection of known size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub num_pages: i64,
}

impl PageSpec {
    /// Resolve `page` against `total` rows. The first page always exists,
    /// even when the collection is empty; any other out-of-range page is
    /// `NotFound`.
    pub fn resolve(page: Option<i64>, per_page: i64, total: i64) -> AppResult<Self> {
        if per_page < 1 {
            return Err(AppError::Internal(format!("Invalid page size {}", per_page)));
        }
        let num_pages = if total <= 0 {
            1
        } else {
            (total + per_page - 1) / per_page
        };
        let page = page.unwrap_or(1);
        if page < 1 || page > num_pages {
            return Err(AppError::NotFound(format!("Invalid page ({})", page)));
        }
        Ok(Self {
            page,
            per_page,
            total,
            num_pages,
        })
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            offset: (self.page - 1) * self.per_page,
            limit: self.per_page,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of rows across all pages
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub num_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
    pub is_paginated: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, spec: PageSpec) -> Self {
        Self {
            items,
            total: spec.total,
            page: spec.page,
            per_page: spec.per_page,
            num_pages: spec.num_pages,
            has_next: spec.page < spec.num_pages,
            has_previous: spec.page > 1,
            is_paginated: spec.num_pages > 1,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            num_pages: self.num_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
            is_paginated: self.is_paginated,
        }
    }
}
