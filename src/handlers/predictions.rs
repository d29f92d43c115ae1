// src/handlers/predictions.rs

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    database::Database,
    error::AppError,
    models::{
        participant::Participant,
        response::ApiResponse,
        submission::{PredictionInput, PredictionView},
    },
    scoring,
};

/// Submits or replaces a player's predictions.
///
/// * Validates the player and the giver -> receiver map against the roster.
/// * Creates the player's submission on first use (Upsert).
pub async fn submit_predictions(
    State(db): State<Database>,
    payload: Result<Json<PredictionInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let user_name = scoring::parse_participant(&payload.user_name)?;
    let predictions = scoring::validate_prediction_map(&payload.predictions)?;

    let submission = db.save_predictions(user_name, predictions).await?;
    tracing::info!("Predictions saved for {}", user_name);

    let view = PredictionView::from_submission(&submission).ok_or_else(|| {
        AppError::InternalServerError("saved submission has no predictions".to_string())
    })?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Predictions saved successfully", view)),
    ))
}

/// Returns one player's predictions. 404 until they have submitted some.
pub async fn get_user_predictions(
    State(db): State<Database>,
    Path(user_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_name = scoring::parse_participant(&user_name)?;

    let submission = db.find_submission(user_name).await?;
    let view = submission
        .as_ref()
        .and_then(PredictionView::from_submission)
        .ok_or_else(|| AppError::NotFound("No predictions found for this user".to_string()))?;

    Ok(Json(ApiResponse::data(view)))
}

/// Lists every participant with whether they have submitted predictions.
pub async fn get_participants_status(
    State(db): State<Database>,
) -> Result<impl IntoResponse, AppError> {
    let participants = db.participants_status().await?;
    let submitted_count = participants.iter().filter(|p| p.has_submitted).count();

    Ok(Json(json!({
        "success": true,
        "data": {
            "totalParticipants": Participant::ALL.len(),
            "submittedCount": submitted_count,
            "participants": participants,
        }
    })))
}

/// Returns everybody's predictions, only once the reveal date has passed.
pub async fn get_all_predictions(
    State(db): State<Database>,
    State(config): State<Config>,
) -> Result<impl IntoResponse, AppError> {
    scoring::ensure_revealed(Utc::now(), config.reveal_date, "Results")?;

    let mut predictions: Vec<PredictionView> = db
        .list_submissions()
        .await?
        .iter()
        .filter_map(PredictionView::from_submission)
        .collect();
    predictions.sort_by_key(|p| p.user_name);

    Ok(Json(json!({
        "success": true,
        "canReveal": true,
        "revealDate": config.reveal_date,
        "data": predictions,
    })))
}
