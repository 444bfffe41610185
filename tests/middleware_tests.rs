//! Integration tests for the path-parameter middleware, driven through a
//! real Axum router.

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::request::Parts;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower::ServiceExt;
use uuid::Uuid;

use service_kit::http::middleware::{
    extract_param, param_from_extensions, require_uuid, uuid_from_extensions, uuid_from_request,
    ParamError,
};

const GAME_UUID: &str = "123e4567-e89b-12d3-a456-426614174000";
const NIL_UUID: &str = "00000000-0000-0000-0000-000000000000";

fn get_request(path: &str) -> Request<Body> {
    Request::get(path).body(Body::empty()).unwrap()
}

async fn body_string(res: Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn uuid_round_trips_through_extensions() {
    async fn show(parts: Parts) -> String {
        uuid_from_extensions(&parts.extensions).unwrap().to_string()
    }

    let app = Router::new().route("/games/{uuid}", get(show).layer(require_uuid()));

    let res = app.oneshot(get_request(&format!("/games/{GAME_UUID}"))).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_string(res).await, GAME_UUID);
}

#[tokio::test]
async fn uuid_round_trips_through_request() {
    async fn show(req: Request<Body>) -> String {
        uuid_from_request(&req).unwrap().to_string()
    }

    let app = Router::new().route("/games/{uuid}", get(show).layer(require_uuid()));

    let res = app.oneshot(get_request(&format!("/games/{GAME_UUID}"))).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_string(res).await, GAME_UUID);
}

#[tokio::test]
async fn nil_uuid_rejected_before_handler() {
    let invoked = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&invoked);

    let app = Router::new().route(
        "/games/{uuid}",
        get(move || {
            let flag = Arc::clone(&flag);
            async move {
                flag.store(true, Ordering::SeqCst);
                StatusCode::OK
            }
        })
        .layer(require_uuid()),
    );

    let res = app.oneshot(get_request(&format!("/games/{NIL_UUID}"))).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(res).await, "invalid uuid");
    assert!(!invoked.load(Ordering::SeqCst));
}

#[tokio::test]
async fn malformed_uuid_rejected_before_handler() {
    let invoked = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&invoked);

    let app = Router::new().route(
        "/games/{uuid}",
        get(move || {
            let flag = Arc::clone(&flag);
            async move {
                flag.store(true, Ordering::SeqCst);
                StatusCode::OK
            }
        })
        .layer(require_uuid()),
    );

    let res = app.oneshot(get_request("/games/not-a-uuid")).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    // The uuid crate's own parse error text is the body.
    assert!(body_string(res).await.contains("invalid"));
    assert!(!invoked.load(Ordering::SeqCst));
}

#[tokio::test]
async fn generic_param_round_trips() {
    async fn show(parts: Parts) -> String {
        let id: i64 = param_from_extensions(&parts.extensions, "id").unwrap();
        id.to_string()
    }

    let app = Router::new().route(
        "/items/{id}",
        get(show).layer(extract_param("id", |raw: &str| raw.parse::<i64>())),
    );

    let res = app.oneshot(get_request("/items/42")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_string(res).await, "42");
}

#[tokio::test]
async fn malformed_generic_param_rejected() {
    async fn show() -> StatusCode {
        StatusCode::OK
    }

    let app = Router::new().route(
        "/items/{id}",
        get(show).layer(extract_param("id", |raw: &str| raw.parse::<i64>())),
    );

    let res = app.oneshot(get_request("/items/forty-two")).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(res).await.contains("invalid digit"));
}

#[tokio::test]
async fn unknown_key_rejected() {
    async fn show() -> StatusCode {
        StatusCode::OK
    }

    let app = Router::new().route(
        "/items/{id}",
        get(show).layer(extract_param("name", |raw: &str| raw.parse::<i64>())),
    );

    let res = app.oneshot(get_request("/items/42")).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(res).await, "unknown path parameter \"name\"");
}

#[tokio::test]
async fn stacked_extractors_keep_both_values() {
    async fn show(parts: Parts) -> String {
        let user: u32 = param_from_extensions(&parts.extensions, "user").unwrap();
        let post: String = param_from_extensions(&parts.extensions, "post").unwrap();
        format!("{user}:{post}")
    }

    let app = Router::new().route(
        "/users/{user}/posts/{post}",
        get(show)
            .layer::<_, Infallible>(extract_param("user", |raw: &str| raw.parse::<u32>()))
            .layer(extract_param("post", |raw: &str| {
                Ok::<_, Infallible>(raw.to_owned())
            })),
    );

    let res = app.oneshot(get_request("/users/7/posts/first")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_string(res).await, "7:first");
}

#[tokio::test]
async fn wrong_type_retrieval_reports_wrong_type() {
    async fn show(parts: Parts) -> Response {
        match param_from_extensions::<String>(&parts.extensions, "id") {
            Err(ParamError::WrongType(key)) => key.into_response(),
            other => (StatusCode::INTERNAL_SERVER_ERROR, format!("{other:?}")).into_response(),
        }
    }

    let app = Router::new().route(
        "/items/{id}",
        get(show).layer(extract_param("id", |raw: &str| raw.parse::<i64>())),
    );

    let res = app.oneshot(get_request("/items/42")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_string(res).await, "id");
}

#[tokio::test]
async fn retrieval_without_extraction_reports_not_found() {
    async fn show(parts: Parts) -> Response {
        match uuid_from_extensions(&parts.extensions) {
            Err(ParamError::NotFound(key)) => key.into_response(),
            other => (StatusCode::INTERNAL_SERVER_ERROR, format!("{other:?}")).into_response(),
        }
    }

    let app = Router::new().route("/games/{uuid}", get(show));

    let res = app.oneshot(get_request(&format!("/games/{GAME_UUID}"))).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_string(res).await, "uuid");
}

#[tokio::test]
async fn concurrent_requests_observe_their_own_values() {
    async fn show(parts: Parts) -> String {
        uuid_from_extensions(&parts.extensions).unwrap().to_string()
    }

    let app = Router::new().route("/games/{uuid}", get(show).layer(require_uuid()));

    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    let (res_first, res_second) = tokio::join!(
        app.clone().oneshot(get_request(&format!("/games/{first}"))),
        app.clone().oneshot(get_request(&format!("/games/{second}"))),
    );

    assert_eq!(body_string(res_first.unwrap()).await, first.to_string());
    assert_eq!(body_string(res_second.unwrap()).await, second.to_string());
}
