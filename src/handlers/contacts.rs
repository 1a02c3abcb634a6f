//! Contact handlers: list, create, read, update, delete.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::model::contact::{parse_id, NOT_FOUND};
use crate::model::{ContactField, ContactFilter, Created, NewContact, Patch};
use crate::response::{created, message, ok};
use crate::service::ContactService;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde_json::Value;
use std::collections::HashMap;

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let filter = ContactFilter::from_params(&params);
    let rows = ContactService::list(&state.pool, &filter).await?;
    Ok(ok(rows))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewContact>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()?;
    let id = ContactService::create(&state.pool, &body).await?;
    Ok(created(Created { id, payload: body }))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str).ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;
    let row = ContactService::get(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;
    Ok(ok(row))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> Result<impl IntoResponse, AppError> {
    let patch = Patch::<ContactField>::from_json(body)?;
    let id = parse_id(&id_str).ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;
    let id = ContactService::update(&state.pool, id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;
    Ok(ok(patch.echo(Value::String(id.to_string()))))
}

/// Succeeds whether or not the contact existed.
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(id) = parse_id(&id_str) {
        ContactService::delete(&state.pool, id).await?;
    }
    Ok(message("Contact deleted successfully"))
}
