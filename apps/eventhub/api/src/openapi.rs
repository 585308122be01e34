use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(crate::api::welcome),
    components(schemas(
        axum_helpers::ErrorResponse,
        axum_helpers::HealthResponse,
        crate::api::WelcomeResponse,
    )),
    info(
        title = "Event Management API",
        version = "0.1.0",
        description = "Schedule events, register attendees and track check-ins"
    ),
    tags((name = "root", description = "Service information"))
)]
struct RootApiDoc;

/// Complete document: root routes plus the events domain, all served at `/`
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = RootApiDoc::openapi();
        doc.merge(domain_events::ApiDoc::openapi());
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_event_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/"));
        assert!(paths.iter().any(|p| p.as_str() == "/events"));
        assert!(paths.iter().any(|p| p.as_str() == "/attendees/{id}/checkin"));
        assert_eq!(doc.info.title, "Event Management API");
    }
}
