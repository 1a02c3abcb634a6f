//! Data access for contacts and categories, plus request validation.

mod categories;
mod contacts;
mod crud;
mod validation;
pub use categories::CategoryService;
pub use contacts::ContactService;
pub use validation::{Format, RequestValidator, ValidationRule};
