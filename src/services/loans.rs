//! Loan management service: borrowed lists, renewals and returns

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book_instance::{BookInstance, LoanEntry},
        pagination::{Page, PageSpec},
        renewal::{RenewBookForm, RenewBookFormState},
    },
    repository::CatalogStore,
};

/// Result of submitting the renewal form
#[derive(Debug, Clone)]
pub enum RenewalOutcome {
    /// Due date stored
    Renewed(BookInstance),
    /// Date refused; nothing stored
    Rejected(RenewBookFormState),
}

#[derive(Clone)]
pub struct LoansService {
    store: Arc<dyn CatalogStore>,
    per_page: i64,
}

impl LoansService {
    pub fn new(store: Arc<dyn CatalogStore>, per_page: i64) -> Self {
        Self { store, per_page }
    }

    /// Copies on loan to `borrower_id`, by due date
    pub async fn list_borrowed_by(
        &self,
        borrower_id: i32,
        page: Option<i64>,
        today: NaiveDate,
    ) -> AppResult<Page<LoanEntry>> {
        self.list_on_loan_for(Some(borrower_id), page, today).await
    }

    /// Every copy on loan, by due date
    pub async fn list_all_on_loan(
        &self,
        page: Option<i64>,
        today: NaiveDate,
    ) -> AppResult<Page<LoanEntry>> {
        self.list_on_loan_for(None, page, today).await
    }

    async fn list_on_loan_for(
        &self,
        borrower_id: Option<i32>,
        page: Option<i64>,
        today: NaiveDate,
    ) -> AppResult<Page<LoanEntry>> {
        let total = self.store.count_instances_on_loan(borrower_id).await?;
        let spec = PageSpec::resolve(page, self.per_page, total)?;
        let instances = self
            .store
            .list_instances_on_loan(borrower_id, spec.window())
            .await?;
        Ok(Page::new(instances, spec).map(|instance| LoanEntry::new(instance, today)))
    }

    /// Renewal form for a copy, pre-filled with the latest allowed date
    pub async fn renewal_form(&self, id: Uuid, today: NaiveDate) -> AppResult<RenewBookFormState> {
        let instance = self.store.get_book_instance(id).await?;
        Ok(RenewBookFormState::initial(instance, today))
    }

    /// Validate the submitted date and store it as the copy's new due date
    pub async fn renew(
        &self,
        id: Uuid,
        form: &RenewBookForm,
        today: NaiveDate,
    ) -> AppResult<RenewalOutcome> {
        let mut instance = self.store.get_book_instance(id).await?;

        let due_back = match form.clean(today) {
            Ok(date) => date,
            Err(e) => {
                tracing::debug!("Renewal of {} to {:?} refused: {}", id, form.renewal_date, e);
                return Ok(RenewalOutcome::Rejected(RenewBookFormState::rejected(
                    instance,
                    form.renewal_date.clone(),
                    e,
                )));
            }
        };

        self.store.set_due_back(id, due_back).await?;
        tracing::info!("Renewed book instance {} until {}", id, due_back);

        instance.due_back = Some(due_back);
        Ok(RenewalOutcome::Renewed(instance))
    }

    /// Mark an on-loan copy as returned and available
    pub async fn mark_returned(&self, id: Uuid) -> AppResult<BookInstance> {
        let instance = self.store.get_book_instance(id).await?;
        if !instance.is_on_loan() {
            return Err(AppError::Conflict(format!(
                "Book instance {} is not on loan",
                id
            )));
        }

        self.store.mark_returned(id).await?;
        tracing::info!("Book instance {} returned", id);

        self.store.get_book_instance(id).await
    }
}
