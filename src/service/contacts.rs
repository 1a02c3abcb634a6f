//! Contact persistence.

use super::crud::{execute, fetch_all, fetch_optional, fetch_scalar};
use crate::error::{is_foreign_key_violation, is_unique_violation, AppError};
use crate::model::{Contact, ContactField, ContactFilter, NewContact, Patch, CONTACTS};
use crate::sql::{delete_by_id, insert, select_by_id, select_list, update_by_id, BindValue};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ContactService;

impl ContactService {
    /// Filtered, ordered page of contacts.
    pub async fn list(pool: &PgPool, filter: &ContactFilter) -> Result<Vec<Contact>, AppError> {
        let q = select_list(&CONTACTS, &filter.to_list_query());
        Ok(fetch_all(pool, &q).await?)
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Contact>, AppError> {
        let q = select_by_id(&CONTACTS, BindValue::Uuid(id));
        Ok(fetch_optional(pool, &q).await?)
    }

    /// Insert and return the generated id. Duplicate email → `Conflict`.
    pub async fn create(pool: &PgPool, contact: &NewContact) -> Result<Uuid, AppError> {
        let q = insert(&CONTACTS, contact.columns());
        let id = fetch_scalar::<Uuid>(pool, &q)
            .await
            .map_err(contact_write_error)?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        tracing::info!(%id, "contact created");
        Ok(id)
    }

    /// Apply a partial update; `None` when no row has this id.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        patch: &Patch<ContactField>,
    ) -> Result<Option<Uuid>, AppError> {
        let Some(q) = update_by_id(&CONTACTS, &patch.assignments, BindValue::Uuid(id)) else {
            return Err(AppError::BadRequest("no updatable fields supplied".into()));
        };
        Ok(fetch_scalar::<Uuid>(pool, &q).await.map_err(contact_write_error)?)
    }

    /// Delete by id; returns affected rows (0 or 1).
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
        let q = delete_by_id(&CONTACTS, BindValue::Uuid(id));
        let n = execute(pool, &q).await?;
        tracing::debug!(%id, rows = n, "contact delete");
        Ok(n)
    }
}

/// `email` is the only unique column and `category_id` the only reference on contacts.
fn contact_write_error(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        tracing::debug!(error = %e, "duplicate contact email");
        AppError::Conflict("A contact with this email already exists".into())
    } else if is_foreign_key_violation(&e) {
        AppError::Validation("category_id does not reference an existing category".into())
    } else {
        e.into()
    }
}
