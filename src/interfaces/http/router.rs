//! Route table with Swagger UI

use std::path::Path;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::modules::{admin, auth, health, metrics, pages, request_id, reservations};
use super::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(health::health_check, reservations::availability_json),
    components(schemas(
        health::HealthResponse,
        health::StorageHealth,
        reservations::AvailabilityRequest,
        reservations::AvailabilityResponse,
    )),
    tags(
        (name = "Health", description = "Liveness and storage probe"),
        (name = "Availability", description = "Room availability lookups"),
    ),
    info(
        title = "Bookings API",
        version = "1.0.0",
        description = "Machine-readable endpoints of the bookings site"
    )
)]
pub struct ApiDoc;

fn guest_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/generals-quarters", get(pages::generals_quarters))
        .route("/majors-suite", get(pages::majors_suite))
        .route("/contact", get(pages::contact))
        .route(
            "/search-availability",
            get(reservations::search_availability).post(reservations::post_availability),
        )
        .route(
            "/search-availability-json",
            post(reservations::availability_json),
        )
        .route("/choose-room/", get(reservations::choose_room))
        .route("/choose-room/{id}", get(reservations::choose_room))
        .route("/book-room", get(reservations::book_room))
        .route(
            "/make-reservation",
            get(reservations::make_reservation).post(reservations::post_reservation),
        )
        .route("/reservation-summary", get(reservations::reservation_summary))
        .route("/user/login", get(auth::login_page).post(auth::post_login))
        .route("/user/logout", get(auth::logout))
        .route("/health", get(health::health_check))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/reservations-new", get(admin::new_reservations))
        .route("/reservations-all", get(admin::all_reservations))
        .route(
            "/reservations/{src}/{id}/show",
            get(admin::show_reservation),
        )
        .route("/reservations/{src}/{id}", post(admin::post_reservation))
        .route(
            "/process-reservation/{src}/{id}/do",
            get(admin::process_reservation),
        )
        .route(
            "/delete-reservation/{src}/{id}/do",
            get(admin::delete_reservation),
        )
        .route("/profile", get(admin::profile).post(admin::post_profile))
        .route_layer(middleware::from_fn(admin::require_authentication))
}

/// Build the full router.
///
/// `/metrics` is mounted only when a Prometheus recorder is installed.
pub fn create_router(
    state: AppState,
    prometheus: Option<PrometheusHandle>,
    static_dir: &Path,
) -> Router {
    let sessions = state.sessions.layer();

    let mut app = Router::new()
        .merge(guest_routes())
        .nest("/admin", admin_routes())
        .with_state(state)
        .nest_service("/static", ServeDir::new(static_dir))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    if let Some(handle) = prometheus {
        app = app.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics::MetricsState { handle }),
        );
    }

    app.layer(sessions)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::request_id_middleware))
}
