//! Contact service: REST CRUD for contacts and categories over PostgreSQL.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;

pub use error::{AppError, ConfigError};
pub use migration::apply_schema;
pub use routes::{build_router, category_routes, common_routes, contact_routes};
pub use service::{CategoryService, ContactService};
pub use settings::Settings;
pub use state::AppState;
