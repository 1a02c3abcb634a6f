//! Routers for the service and the middleware stack around them.

mod common;
mod resources;

pub use common::common_routes;
pub use resources::{category_routes, contact_routes};

use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Full application router: common, contact, and category routes with tracing and a body limit.
pub fn build_router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(contact_routes(state.clone()))
        .merge(category_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(body_limit_bytes)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    // Nothing here reaches the database; the pool never connects.
    fn app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://postgres@127.0.0.1:1/unused")
            .expect("static url parses");
        build_router(AppState::new(pool), 1024)
    }

    fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let resp = app().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn as_json(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn home_page_is_plain_text() {
        let (status, body) = send(Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Just Default Home Page!");
    }

    #[tokio::test]
    async fn health_and_version() {
        let (status, body) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(as_json(&body), json!({"status": "ok"}));
        let (_, body) = send(Request::get("/version").body(Body::empty()).unwrap()).await;
        assert_eq!(as_json(&body)["name"], "contact-service");
    }

    #[tokio::test]
    async fn malformed_ids_are_not_found() {
        let (status, body) = send(Request::get("/contacts/not-a-uuid").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(String::from_utf8_lossy(&body).contains("Contact not found"));

        let (status, body) = send(Request::get("/categories/abc").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(as_json(&body)["error"]["message"], "Category not found");

        let (status, _) = send(json_request(Method::PATCH, "/contacts/nope", r#"{"phone":"1"}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deleting_unparseable_id_still_succeeds() {
        let req = Request::delete("/contacts/not-a-uuid").body(Body::empty()).unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(as_json(&body), json!({"message": "Contact deleted successfully"}));
    }

    #[tokio::test]
    async fn patch_outside_allow_list_is_rejected() {
        let uri = "/contacts/67e55044-10b1-426f-9247-bb680e5fe0c8";
        let (status, body) = send(json_request(Method::PATCH, uri, r#"{"id = id; --": "x"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(as_json(&body)["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn patch_with_only_nulls_is_rejected() {
        let uri = "/categories/1";
        let (status, body) = send(json_request(Method::PATCH, uri, r#"{"label": null}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(as_json(&body)["error"]["message"]
            .as_str()
            .unwrap()
            .contains("no updatable fields supplied"));
    }

    #[tokio::test]
    async fn create_requires_fields_and_json() {
        let (status, _) = send(json_request(Method::POST, "/contacts", r#"{"name":"Al"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(json_request(Method::POST, "/contacts", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let req = Request::post("/categories")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(r#"{"label":"x"}"#))
            .unwrap();
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body = r#"{"name":"Al","email":"not-an-email"}"#;
        let (status, body) = send(json_request(Method::POST, "/contacts", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(as_json(&body)["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn oversized_bodies_are_refused() {
        let big = format!(r#"{{"label":"{}"}}"#, "x".repeat(4096));
        let req = Request::post("/categories")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, big.len())
            .body(Body::from(big))
            .unwrap();
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn oversized_bodies_without_length_are_refused() {
        let big = format!(r#"{{"label":"{}"}}"#, "x".repeat(4096));
        let (status, body) = send(json_request(Method::POST, "/categories", &big)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(as_json(&body)["error"]["code"], "payload_too_large");
    }
}
