//! Statement execution against PostgreSQL. Each call checks one connection out of the pool.

use crate::sql::QueryBuf;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

pub(crate) async fn fetch_all<T>(pool: &PgPool, q: &QueryBuf) -> Result<Vec<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_as::<_, T>(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    query.fetch_all(pool).await
}

pub(crate) async fn fetch_optional<T>(pool: &PgPool, q: &QueryBuf) -> Result<Option<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_as::<_, T>(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    query.fetch_optional(pool).await
}

/// Single-column result, e.g. `RETURNING id`.
pub(crate) async fn fetch_scalar<O>(pool: &PgPool, q: &QueryBuf) -> Result<Option<O>, sqlx::Error>
where
    O: Send + Unpin,
    (O,): for<'r> FromRow<'r, PgRow>,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_scalar::<_, O>(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    query.fetch_optional(pool).await
}

/// Returns the number of affected rows.
pub(crate) async fn execute(pool: &PgPool, q: &QueryBuf) -> Result<u64, sqlx::Error> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    Ok(query.execute(pool).await?.rows_affected())
}
