//! Idempotent DDL for the `categories` and `contacts` tables.
//! `gen_random_uuid()` is built in from PostgreSQL 13.

use crate::error::AppError;
use sqlx::PgPool;

/// Advisory lock key serializing concurrent bootstraps.
const SCHEMA_LOCK_KEY: i64 = 0x636f_6e74_6163_7473;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id SERIAL PRIMARY KEY,
        label VARCHAR(255) UNIQUE NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS contacts (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name VARCHAR(255) NOT NULL,
        email VARCHAR(255) UNIQUE NOT NULL,
        phone VARCHAR(255),
        category_id INTEGER REFERENCES categories(id),
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    "CREATE INDEX IF NOT EXISTS contacts_category_id_idx ON contacts (category_id)",
    "CREATE INDEX IF NOT EXISTS contacts_created_at_idx ON contacts (created_at, id)",
];

/// Create the tables if missing. Safe to run from several processes at once.
pub async fn apply_schema(pool: &PgPool) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;
    for ddl in STATEMENTS {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    tracing::info!("schema ready");
    Ok(())
}
