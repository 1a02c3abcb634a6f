//! Contact rows, create payload, list filter, and patchable fields.

use super::patch::{int4_value, text_value, PatchField};
use super::{non_empty, skip_limit};
use crate::error::AppError;
use crate::service::{Format, RequestValidator, ValidationRule};
use crate::sql::{BindValue, Filter, ListQuery, SortDir, Table, UpdatableField};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

pub const CONTACTS: Table = Table {
    name: "contacts",
    pk: "id",
    columns: &[
        "id",
        "name",
        "email",
        "phone",
        "category_id",
        "created_at",
        "updated_at",
    ],
};

pub const NOT_FOUND: &str = "Contact not found";
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 1000;

const NAME_RULE: ValidationRule = ValidationRule::text(true, 255);
const EMAIL_RULE: ValidationRule = ValidationRule::text(true, 255).with_format(Format::Email);
const PHONE_RULE: ValidationRule = ValidationRule::text(false, 255);

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub category_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub category_id: Option<i32>,
}

impl NewContact {
    pub fn validate(&self) -> Result<(), AppError> {
        RequestValidator::validate("name", &self.name, &NAME_RULE)?;
        RequestValidator::validate("email", &self.email, &EMAIL_RULE)?;
        RequestValidator::validate_optional("phone", self.phone.as_deref(), &PHONE_RULE)?;
        Ok(())
    }

    pub fn columns(&self) -> Vec<(&'static str, BindValue)> {
        vec![
            ("name", BindValue::text(&self.name)),
            ("email", BindValue::text(&self.email)),
            ("phone", BindValue::Text(self.phone.clone())),
            ("category_id", BindValue::Int4(self.category_id)),
        ]
    }
}

/// Contacts have a UUID key; anything else cannot name a row.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Phone,
    CategoryId,
}

impl UpdatableField for ContactField {
    fn column(self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::CategoryId => "category_id",
        }
    }
}

impl PatchField for ContactField {
    const ALLOWED: &'static [&'static str] = &["name", "email", "phone", "category_id"];

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "name" => Some(ContactField::Name),
            "email" => Some(ContactField::Email),
            "phone" => Some(ContactField::Phone),
            "category_id" => Some(ContactField::CategoryId),
            _ => None,
        }
    }

    fn bind(self, value: &Value) -> Result<BindValue, AppError> {
        match self {
            ContactField::Name => text_value("name", value, &NAME_RULE),
            ContactField::Email => text_value("email", value, &EMAIL_RULE),
            ContactField::Phone => text_value("phone", value, &PHONE_RULE),
            ContactField::CategoryId => int4_value("category_id", value),
        }
    }
}

/// Query-string filter for `GET /contacts`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContactFilter {
    pub skip: i64,
    pub limit: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub category: Option<String>,
    pub newest_first: bool,
}

impl ContactFilter {
    /// Unknown keys, empty values, and unparseable numbers are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let (skip, limit) = skip_limit(params);
        ContactFilter {
            skip,
            limit: limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT),
            name: non_empty(params, "name"),
            email: non_empty(params, "email"),
            category: non_empty(params, "category"),
            newest_first: params.get("sort_by").map(String::as_str) == Some("created"),
        }
    }

    pub fn to_list_query(&self) -> ListQuery {
        let mut filters = Vec::new();
        if let Some(needle) = &self.name {
            filters.push(Filter::Contains {
                column: "name",
                needle: needle.clone(),
            });
        }
        if let Some(needle) = &self.email {
            filters.push(Filter::Contains {
                column: "email",
                needle: needle.clone(),
            });
        }
        if let Some(needle) = &self.category {
            filters.push(Filter::ContainsVia {
                column: "category_id",
                table: super::category::CATEGORIES.name,
                key: super::category::CATEGORIES.pk,
                label: "label",
                needle: needle.clone(),
            });
        }
        let dir = if self.newest_first { SortDir::Desc } else { SortDir::Asc };
        ListQuery {
            filters,
            order: vec![("created_at", dir), ("id", dir)],
            limit: Some(self.limit),
            offset: self.skip,
        }
    }
}
