//! End-to-end tests for the post routes against the in-memory store.

use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use postbox_core::domain::NewPost;
use postbox_core::ports::{BaseRepository, PostRepository, TokenService};
use postbox_infra::{InMemoryPostRepository, JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "handler-test-secret".to_string(),
        expiration_hours: 1,
        issuer: "postbox-test".to_string(),
    }
}

struct Harness {
    state: AppState,
    repo: Arc<InMemoryPostRepository>,
    token: String,
}

fn harness() -> Harness {
    let repo = Arc::new(InMemoryPostRepository::new());
    let tokens = Arc::new(JwtTokenService::new(jwt_config()));
    let token = tokens.generate_token("1", vec!["user".to_string()]).unwrap();

    Harness {
        state: AppState::from_parts(repo.clone(), tokens, 15),
        repo,
        token,
    }
}

impl Harness {
    fn bearer(&self) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", self.token))
    }

    async fn seed(&self, title: &str) -> i64 {
        self.repo.create(NewPost::new(title)).await.unwrap().id
    }
}

macro_rules! init_app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($harness.state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn header_request_id<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string()
}

fn assert_post_shape(body: &Value) {
    for key in ["id", "title", "created_at", "updated_at"] {
        assert!(body.get(key).is_some(), "missing {key} in {body}");
    }
}

#[actix_web::test]
async fn test_store() {
    let h = harness();
    let app = init_app!(h);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(h.bearer())
        .set_json(json!({ "title": "El post de prueba" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_post_shape(&body);
    assert_eq!(body["title"], "El post de prueba");

    let id = body["id"].as_i64().unwrap();
    let stored = h.repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.title, "El post de prueba");
}

#[actix_web::test]
async fn test_store_trims_title() {
    let h = harness();
    let app = init_app!(h);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(h.bearer())
        .set_json(json!({ "title": "  Hola  " }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["title"], "Hola");
}

#[actix_web::test]
async fn test_validate_title() {
    let h = harness();
    let app = init_app!(h);

    for payload in [json!({ "title": "" }), json!({ "title": "   " }), json!({})] {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(h.bearer())
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{payload}");
        let request_id = header_request_id(&resp);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"]["title"][0], "The title field is required.");
        assert_eq!(body["request_id"], request_id);
    }

    assert!(h.repo.is_empty().await);
}

#[actix_web::test]
async fn test_validate_title_length() {
    let h = harness();
    let app = init_app!(h);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(h.bearer())
        .set_json(json!({ "title": "a".repeat(256) }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(h.repo.is_empty().await);
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let h = harness();
    let app = init_app!(h);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(h.bearer())
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"title\":")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let request_id = header_request_id(&resp);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["request_id"], request_id);
}

#[actix_web::test]
async fn test_show() {
    let h = harness();
    let id = h.seed("Un post").await;
    let app = init_app!(h);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{id}"))
        .insert_header(h.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_post_shape(&body);
    assert_eq!(body["title"], "Un post");
    assert_eq!(body["id"], id);
}

#[actix_web::test]
async fn test_404_show() {
    let h = harness();
    let app = init_app!(h);

    for uri in ["/api/posts/1000", "/api/posts/not-a-number"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(h.bearer())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        let request_id = header_request_id(&resp);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 404);
        assert_eq!(body["request_id"], request_id);
    }
}

#[actix_web::test]
async fn test_update() {
    let h = harness();
    let id = h.seed("Viejo titulo").await;
    let app = init_app!(h);

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{id}"))
        .insert_header(h.bearer())
        .set_json(json!({ "title": "Nuevo titulo" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_post_shape(&body);
    assert_eq!(body["title"], "Nuevo titulo");

    let stored = h.repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Nuevo titulo");
    assert!(stored.updated_at >= stored.created_at);
}

#[actix_web::test]
async fn test_update_rejects_empty_title() {
    let h = harness();
    let id = h.seed("Original").await;
    let app = init_app!(h);

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{id}"))
        .insert_header(h.bearer())
        .set_json(json!({ "title": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let stored = h.repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Original");
}

#[actix_web::test]
async fn test_update_missing_post() {
    let h = harness();
    let app = init_app!(h);

    let req = test::TestRequest::put()
        .uri("/api/posts/1000")
        .insert_header(h.bearer())
        .set_json(json!({ "title": "Nuevo titulo" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_delete() {
    let h = harness();
    let id = h.seed("Para borrar").await;
    let app = init_app!(h);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{id}"))
        .insert_header(h.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(test::read_body(resp).await.is_empty());
    assert!(h.repo.find_by_id(id).await.unwrap().is_none());

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{id}"))
        .insert_header(h.bearer())
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{id}"))
        .insert_header(h.bearer())
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn test_index() {
    let h = harness();
    for i in 0..5 {
        h.seed(&format!("Post {i}")).await;
    }
    let app = init_app!(h);

    let req = test::TestRequest::get()
        .uri("/api/posts")
        .insert_header(h.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 5);
    data.iter().for_each(assert_post_shape);
    assert_eq!(body["meta"]["total"], 5);
    assert_eq!(body["meta"]["current_page"], 1);
    assert_eq!(body["meta"]["per_page"], 15);
}

#[actix_web::test]
async fn test_index_pagination() {
    let h = harness();
    for i in 0..5 {
        h.seed(&format!("Post {i}")).await;
    }
    let app = init_app!(h);

    let req = test::TestRequest::get()
        .uri("/api/posts?page=3&per_page=2")
        .insert_header(h.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "Post 4");
    assert_eq!(body["meta"]["last_page"], 3);
    assert_eq!(body["meta"]["from"], 5);
    assert_eq!(body["meta"]["to"], 5);

    let req = test::TestRequest::get()
        .uri("/api/posts?page=9&per_page=1000")
        .insert_header(h.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["meta"]["per_page"], 100);
    assert!(body["meta"]["from"].is_null());

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts?page={}", u64::MAX))
        .insert_header(h.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["meta"]["total"], 5);
}

#[actix_web::test]
async fn test_guest() {
    let h = harness();
    let app = init_app!(h);

    let requests = [
        test::TestRequest::get().uri("/api/posts"),
        test::TestRequest::get().uri("/api/posts/10"),
        test::TestRequest::put().uri("/api/posts/10"),
        test::TestRequest::delete().uri("/api/posts/10"),
        test::TestRequest::post().uri("/api/posts"),
    ];

    for req in requests {
        let resp = test::call_service(&app, req.to_request()).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().contains_key("x-request-id"));
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 401);
        assert!(body["request_id"].is_string());
    }
}

#[actix_web::test]
async fn test_auth_checked_before_validation() {
    let h = harness();
    let app = init_app!(h);

    // Invalid body and unknown id, but no credentials.
    let req = test::TestRequest::put()
        .uri("/api/posts/1000")
        .set_json(json!({ "title": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({ "title": "Sin token" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(h.repo.is_empty().await);
}

#[actix_web::test]
async fn test_rejects_bad_tokens() {
    let h = harness();
    let app = init_app!(h);

    let foreign = JwtTokenService::new(JwtConfig {
        secret: "some-other-secret".to_string(),
        ..jwt_config()
    })
    .generate_token("1", vec![])
    .unwrap();
    let expired = JwtTokenService::new(JwtConfig {
        expiration_hours: -1,
        ..jwt_config()
    })
    .generate_token("1", vec![])
    .unwrap();

    for value in [
        format!("Bearer {foreign}"),
        format!("Bearer {expired}"),
        format!("Token {}", h.token),
        "Bearer garbage".to_string(),
    ] {
        let req = test::TestRequest::get()
            .uri("/api/posts")
            .insert_header((header::AUTHORIZATION, value.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{value}");
    }
}

#[actix_web::test]
async fn test_request_id_is_echoed() {
    let h = harness();
    let app = init_app!(h);

    let req = test::TestRequest::get()
        .uri("/api/posts")
        .insert_header(h.bearer())
        .insert_header(("X-Request-ID", "trace-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.headers().get("x-request-id").unwrap(), "trace-123");
}

#[actix_web::test]
async fn test_health_is_public() {
    let h = harness();
    let app = init_app!(h);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
}
