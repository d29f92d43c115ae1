// src/handlers/scores.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;

use crate::{
    config::Config, database::Database, error::AppError, models::response::ApiResponse, scoring,
};

/// Prediction scores for every player, best first.
///
/// Hidden until the reveal date, and unavailable until an admin has
/// set the correct pairing.
pub async fn get_scores(
    State(db): State<Database>,
    State(config): State<Config>,
) -> Result<impl IntoResponse, AppError> {
    scoring::ensure_revealed(Utc::now(), config.reveal_date, "Scores")?;

    let correct = db.get_correct_answers().await?.ok_or_else(|| {
        AppError::PreconditionFailed("Correct answers have not been set yet".to_string())
    })?;

    let submissions = db.list_submissions().await?;
    let scores = scoring::prediction_scores(&submissions, &correct);

    Ok(Json(json!({
        "success": true,
        "canReveal": true,
        "hasCorrectAnswers": true,
        "data": scores,
    })))
}

/// Quiz and prediction results of one player folded into one score.
pub async fn get_combined_score(
    State(db): State<Database>,
    Path(user_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_name = scoring::parse_participant(&user_name)?;

    let submission = db.find_submission(user_name).await?;
    let correct = db.get_correct_answers().await?;
    let quiz_key = db.get_quiz_correct_answers().await?;

    let score = scoring::combined_score(
        user_name,
        submission.as_ref(),
        correct.as_ref(),
        quiz_key.as_ref(),
    );

    Ok(Json(ApiResponse::data(score)))
}

/// Ranks every player who has submitted anything.
pub async fn get_scoreboard(State(db): State<Database>) -> Result<impl IntoResponse, AppError> {
    let submissions = db.list_submissions().await?;
    let correct = db.get_correct_answers().await?;
    let quiz_key = db.get_quiz_correct_answers().await?;

    let board = scoring::scoreboard(&submissions, correct.as_ref(), quiz_key.as_ref());

    Ok(Json(json!({
        "success": true,
        "hasAdminAnswers": correct.is_some() || quiz_key.is_some(),
        "data": board,
    })))
}
