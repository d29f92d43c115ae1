// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{admin, health, predictions, quiz, scores},
    state::AppState,
    utils::admin_key::{ADMIN_KEY_HEADER, admin_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (predictions, quiz, scores, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database, Config).
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let prediction_routes = Router::new()
        .route("/", post(predictions::submit_predictions))
        .route("/status", get(predictions::get_participants_status))
        .route("/all", get(predictions::get_all_predictions))
        .route("/{user_name}", get(predictions::get_user_predictions));

    let quiz_routes = Router::new()
        .route("/questions", get(quiz::list_questions))
        .route("/answers", post(quiz::submit_answer))
        .route("/score/{user_name}", get(quiz::get_quiz_score));

    let score_routes = Router::new()
        .route("/", get(scores::get_scores))
        .route("/combined/{user_name}", get(scores::get_combined_score));

    let admin_routes = Router::new()
        .route("/answers", post(admin::set_correct_answers))
        .route("/quiz/answers", post(admin::set_quiz_correct_answers))
        .route("/quiz/questions", get(admin::list_questions))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ));

    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/scoreboard", get(scores::get_scoreboard))
        .nest("/api/predictions", prediction_routes)
        .nest("/api/quiz", quiz_routes)
        .nest("/api/scores", score_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// `*` allows any origin; otherwise only the listed origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, ADMIN_KEY_HEADER]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}
