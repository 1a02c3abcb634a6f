//! HTTP handlers for contacts and categories.

pub mod categories;
pub mod contacts;
