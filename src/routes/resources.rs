//! CRUD routes for contacts and categories.

use crate::handlers::{categories, contacts};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn contact_routes(state: AppState) -> Router {
    Router::new()
        .route("/contacts", get(contacts::list).post(contacts::create))
        .route(
            "/contacts/:id",
            get(contacts::read)
                .patch(contacts::update)
                .delete(contacts::delete),
        )
        .with_state(state)
}

pub fn category_routes(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/:id",
            get(categories::read)
                .patch(categories::update)
                .delete(categories::delete),
        )
        .with_state(state)
}
