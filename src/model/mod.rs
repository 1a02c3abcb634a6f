//! Resource types: rows, create payloads, list filters, and patchable fields.

pub mod category;
pub mod contact;
mod patch;

pub use category::{Category, CategoryField, CategoryFilter, NewCategory, CATEGORIES};
pub use contact::{Contact, ContactField, ContactFilter, NewContact, CONTACTS};
pub use patch::{Patch, PatchField};

use serde::Serialize;
use std::collections::HashMap;

/// Create response: the accepted payload merged with the generated id.
#[derive(Debug, Serialize)]
pub struct Created<I, T> {
    pub id: I,
    #[serde(flatten)]
    pub payload: T,
}

/// `skip` and `limit` as non-negative integers, saturating at `i64::MAX`;
/// anything else is treated as absent.
fn skip_limit(params: &HashMap<String, String>) -> (i64, Option<i64>) {
    let parse = |key: &str| {
        params
            .get(key)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|n| i64::try_from(n).unwrap_or(i64::MAX))
    };
    (parse("skip").unwrap_or(0), parse("limit"))
}

/// A non-empty filter value, or `None`. Whitespace is part of the needle.
fn non_empty(params: &HashMap<String, String>, key: &str) -> Option<String> {
    params.get(key).filter(|v| !v.is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn created_flattens_payload() {
        let body = Created {
            id: 4,
            payload: NewCategory { label: "Work".into() },
        };
        assert_eq!(serde_json::to_value(body).unwrap(), json!({"id": 4, "label": "Work"}));
    }
}
