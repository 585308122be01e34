use axum::{Json, Router, routing::get};
use domain_events::{EventRepository, EventService, handlers};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct WelcomeResponse {
    pub message: &'static str,
}

/// Service greeting
#[utoipa::path(
    get,
    path = "/",
    tag = "root",
    responses(
        (status = 200, description = "Welcome message", body = WelcomeResponse)
    )
)]
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Event Management API",
    })
}

/// Creates the application routes.
///
/// Returns a stateless Router; the events router applies its own state.
pub fn routes<R: EventRepository + 'static>(service: EventService<R>) -> Router {
    Router::new()
        .route("/", get(welcome))
        .merge(handlers::router(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use domain_events::InMemoryEventRepository;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_welcome_message() {
        let app = routes(EventService::new(InMemoryEventRepository::new()));

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Welcome to the Event Management API");
    }

    #[tokio::test]
    async fn test_events_routes_are_mounted() {
        let app = routes(EventService::new(InMemoryEventRepository::new()));

        let response = app
            .oneshot(Request::get("/events").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
