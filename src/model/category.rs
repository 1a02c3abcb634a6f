//! Category rows, create payload, list filter, and patchable fields.

use super::patch::{text_value, PatchField};
use super::{non_empty, skip_limit};
use crate::error::AppError;
use crate::service::{RequestValidator, ValidationRule};
use crate::sql::{BindValue, Filter, ListQuery, SortDir, Table, UpdatableField};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub const CATEGORIES: Table = Table {
    name: "categories",
    pk: "id",
    columns: &["id", "label", "created_at", "updated_at"],
};

pub const NOT_FOUND: &str = "Category not found";
pub const MAX_LIMIT: i64 = 1000;

const LABEL_RULE: ValidationRule = ValidationRule::text(true, 255);

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i32,
    pub label: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewCategory {
    pub label: String,
}

impl NewCategory {
    pub fn validate(&self) -> Result<(), AppError> {
        RequestValidator::validate("label", &self.label, &LABEL_RULE)
    }

    pub fn columns(&self) -> Vec<(&'static str, BindValue)> {
        vec![("label", BindValue::text(&self.label))]
    }
}

pub fn parse_id(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryField {
    Label,
}

impl UpdatableField for CategoryField {
    fn column(self) -> &'static str {
        match self {
            CategoryField::Label => "label",
        }
    }
}

impl PatchField for CategoryField {
    const ALLOWED: &'static [&'static str] = &["label"];

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "label" => Some(CategoryField::Label),
            _ => None,
        }
    }

    fn bind(self, value: &Value) -> Result<BindValue, AppError> {
        match self {
            CategoryField::Label => text_value("label", value, &LABEL_RULE),
        }
    }
}

/// Query-string filter for `GET /categories`. Without `limit` every row is returned.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryFilter {
    pub skip: i64,
    pub limit: Option<i64>,
    pub label: Option<String>,
}

impl CategoryFilter {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let (skip, limit) = skip_limit(params);
        CategoryFilter {
            skip,
            limit: limit.map(|n| n.min(MAX_LIMIT)),
            label: non_empty(params, "label"),
        }
    }

    pub fn to_list_query(&self) -> ListQuery {
        let filters = self
            .label
            .iter()
            .map(|needle| Filter::Contains {
                column: "label",
                needle: needle.clone(),
            })
            .collect();
        ListQuery {
            filters,
            order: vec![("id", SortDir::Asc)],
            limit: self.limit,
            offset: self.skip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Patch;
    use serde_json::json;

    #[test]
    fn unbounded_by_default() {
        let f = CategoryFilter::from_params(&HashMap::new());
        assert_eq!(f.limit, None);
        assert!(f.to_list_query().limit.is_none());
    }

    #[test]
    fn label_filter_and_cap() {
        let params: HashMap<String, String> = [("label", "wo"), ("limit", "99999")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let f = CategoryFilter::from_params(&params);
        assert_eq!(f.limit, Some(MAX_LIMIT));
        assert_eq!(f.to_list_query().filters.len(), 1);
    }

    #[test]
    fn only_label_is_patchable() {
        assert!(Patch::<CategoryField>::from_json(json!({"label": "Friends"})).is_ok());
        assert!(Patch::<CategoryField>::from_json(json!({"created_at": "2020-01-01"})).is_err());
        assert!(Patch::<CategoryField>::from_json(json!({"label": ""})).is_err());
        assert!(Patch::<CategoryField>::from_json(json!({"label": null})).is_err());
    }

    #[test]
    fn ids_are_integers() {
        assert_eq!(parse_id("12"), Some(12));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("99999999999"), None);
    }
}
