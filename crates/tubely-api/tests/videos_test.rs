//! Authentication, record lookup, health and OpenAPI integration tests.
//!
//! Run with: `cargo test -p tubely-api --test videos_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use helpers::fixtures::fake_png;
use helpers::{bearer, setup_test_app, token_for, TEST_JWT_SECRET};
use tubely_core::models::Video;
use uuid::Uuid;

fn png_form() -> MultipartForm {
    MultipartForm::new().add_part(
        "thumbnail",
        Part::bytes(fake_png(1024)).file_name("thumb.png").mime_type("image/png"),
    )
}

#[tokio::test]
async fn test_owner_can_read_video() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.videos.insert_video(owner);

    let response = app
        .client()
        .get(&format!("/videos/{}", video.id))
        .add_header("Authorization", bearer(&token_for(owner)))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Video>(), video);
}

#[tokio::test]
async fn test_read_reflects_upload() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.videos.insert_video(owner);
    let token = token_for(owner);

    let upload = app
        .client()
        .post(&format!("/videos/{}/thumbnail", video.id))
        .add_header("Authorization", bearer(&token))
        .multipart(png_form())
        .await;
    assert_eq!(upload.status_code(), StatusCode::OK);

    let read = app
        .client()
        .get(&format!("/videos/{}", video.id))
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(read.json::<Video>(), upload.json::<Video>());
}

#[tokio::test]
async fn test_other_user_cannot_read_video() {
    let app = setup_test_app().await;
    let video = app.videos.insert_video(Uuid::new_v4());

    let response = app
        .client()
        .get(&format!("/videos/{}", video.id))
        .add_header("Authorization", bearer(&token_for(Uuid::new_v4())))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_video_is_not_found() {
    let app = setup_test_app().await;
    let user = Uuid::new_v4();

    let response = app
        .client()
        .post(&format!("/videos/{}/thumbnail", Uuid::new_v4()))
        .add_header("Authorization", bearer(&token_for(user)))
        .multipart(png_form())
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(app.videos.update_count(), 0);
}

#[tokio::test]
async fn test_invalid_video_id() {
    let app = setup_test_app().await;

    for path in ["/videos/not-a-uuid/thumbnail", "/videos/not-a-uuid/video"] {
        let response = app.client().post(path).multipart(png_form()).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_missing_token() {
    let app = setup_test_app().await;
    let video = app.videos.insert_video(Uuid::new_v4());

    let response = app
        .client()
        .post(&format!("/videos/{}/thumbnail", video.id))
        .multipart(png_form())
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(app.videos.update_count(), 0);
}

#[tokio::test]
async fn test_rejected_tokens() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.videos.insert_video(owner);

    let expired =
        tubely_api::auth::make_jwt(owner, TEST_JWT_SECRET, chrono::Duration::seconds(-60))
            .unwrap();
    let wrong_secret = tubely_api::auth::make_jwt(
        owner,
        "some-other-secret-that-is-long-enough",
        chrono::Duration::hours(1),
    )
    .unwrap();

    for header in [
        bearer(&expired),
        bearer(&wrong_secret),
        bearer("not.a.jwt"),
        format!("Basic {}", token_for(owner)),
    ] {
        let response = app
            .client()
            .post(&format!("/videos/{}/video", video.id))
            .add_header("Authorization", header)
            .multipart(png_form())
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    assert_eq!(app.videos.update_count(), 0);
    assert_eq!(app.storage.call_count(), 0);
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "healthy");

    app.videos.fail_ping();
    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn test_openapi_document() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body["paths"]["/videos/{video_id}/thumbnail"]["post"].is_object());
    assert!(body["paths"]["/videos/{video_id}/video"]["post"].is_object());
}
