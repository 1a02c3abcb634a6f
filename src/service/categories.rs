//! Category persistence.

use super::crud::{execute, fetch_all, fetch_optional, fetch_scalar};
use crate::error::{is_foreign_key_violation, is_unique_violation, AppError};
use crate::model::{Category, CategoryField, CategoryFilter, NewCategory, Patch, CATEGORIES};
use crate::sql::{delete_by_id, insert, select_by_id, select_list, update_by_id, BindValue};
use sqlx::PgPool;

pub struct CategoryService;

impl CategoryService {
    pub async fn list(pool: &PgPool, filter: &CategoryFilter) -> Result<Vec<Category>, AppError> {
        let q = select_list(&CATEGORIES, &filter.to_list_query());
        Ok(fetch_all(pool, &q).await?)
    }

    pub async fn get(pool: &PgPool, id: i32) -> Result<Option<Category>, AppError> {
        let q = select_by_id(&CATEGORIES, BindValue::Int4(Some(id)));
        Ok(fetch_optional(pool, &q).await?)
    }

    /// Insert and return the generated id. Duplicate label → `Conflict`.
    pub async fn create(pool: &PgPool, category: &NewCategory) -> Result<i32, AppError> {
        let q = insert(&CATEGORIES, category.columns());
        let id = fetch_scalar::<i32>(pool, &q)
            .await
            .map_err(duplicate_label)?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        tracing::info!(id, "category created");
        Ok(id)
    }

    pub async fn update(
        pool: &PgPool,
        id: i32,
        patch: &Patch<CategoryField>,
    ) -> Result<Option<i32>, AppError> {
        let Some(q) = update_by_id(&CATEGORIES, &patch.assignments, BindValue::Int4(Some(id))) else {
            return Err(AppError::BadRequest("no updatable fields supplied".into()));
        };
        Ok(fetch_scalar::<i32>(pool, &q).await.map_err(duplicate_label)?)
    }

    /// Delete by id. Categories still referenced by contacts are kept (`Conflict`).
    pub async fn delete(pool: &PgPool, id: i32) -> Result<u64, AppError> {
        let q = delete_by_id(&CATEGORIES, BindValue::Int4(Some(id)));
        let n = execute(pool, &q).await.map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::Conflict("Category is still referenced by contacts".into())
            } else {
                AppError::from(e)
            }
        })?;
        tracing::debug!(id, rows = n, "category delete");
        Ok(n)
    }
}

fn duplicate_label(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        tracing::debug!(error = %e, "duplicate category label");
        AppError::Conflict("A category with this label already exists".into())
    } else {
        e.into()
    }
}
