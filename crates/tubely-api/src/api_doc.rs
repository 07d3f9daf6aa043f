//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use tubely_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely API",
        version = "0.1.0",
        description = "Video metadata service. Owners upload a thumbnail and a video file for each video record; the service stores them and records their URLs."
    ),
    paths(
        handlers::thumbnail_upload::upload_thumbnail,
        handlers::video_upload::upload_video,
        handlers::video_get::get_video,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::Video,
            handlers::health::HealthCheckResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "videos", description = "Video records and their thumbnail and video uploads"),
        (name = "config", description = "Service health checks")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            let mut scheme = Http::new(HttpAuthScheme::Bearer);
            scheme.bearer_format = Some("JWT".to_string());
            components.add_security_scheme("bearer_auth", SecurityScheme::Http(scheme));
        }
    }
}
