//! Values bound to `$n` placeholders. Each variant reports its own PostgreSQL type.

use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value that can be bound to a PostgreSQL query.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Text(Option<String>),
    Int4(Option<i32>),
    Int8(i64),
    Uuid(uuid::Uuid),
}

impl BindValue {
    pub fn text(s: impl Into<String>) -> Self {
        BindValue::Text(Some(s.into()))
    }

    pub fn pg_type(&self) -> PgTypeInfo {
        match self {
            BindValue::Text(_) => <String as Type<Postgres>>::type_info(),
            BindValue::Int4(_) => <i32 as Type<Postgres>>::type_info(),
            BindValue::Int8(_) => <i64 as Type<Postgres>>::type_info(),
            BindValue::Uuid(_) => <uuid::Uuid as Type<Postgres>>::type_info(),
        }
    }

    /// JSON form used when echoing accepted values back to the client.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            BindValue::Text(Some(s)) => Value::String(s.clone()),
            BindValue::Int4(Some(n)) => Value::Number((*n).into()),
            BindValue::Int8(n) => Value::Number((*n).into()),
            BindValue::Uuid(u) => Value::String(u.to_string()),
            BindValue::Text(None) | BindValue::Int4(None) => Value::Null,
        }
    }
}

impl<'q> Encode<'q, Postgres> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            BindValue::Text(s) => <Option<String> as Encode<Postgres>>::encode_by_ref(s, buf),
            BindValue::Int4(n) => <Option<i32> as Encode<Postgres>>::encode_by_ref(n, buf),
            BindValue::Int8(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf),
            BindValue::Uuid(u) => <uuid::Uuid as Encode<Postgres>>::encode_by_ref(u, buf),
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(self.pg_type())
    }
}

impl Type<Postgres> for BindValue {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }
}
