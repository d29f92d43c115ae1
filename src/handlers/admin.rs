// src/handlers/admin.rs

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use chrono::Utc;

use crate::{
    config::Config,
    database::Database,
    error::AppError,
    models::{
        answers::{AnswersInput, CorrectAnswers, QuizAnswersInput, QuizCorrectAnswers},
        question::{AdminQuestion, catalog},
        response::ApiResponse,
    },
    scoring,
};

/// Sets the real gift-exchange pairing.
/// Admin only. Validated with the same rules as player predictions.
pub async fn set_correct_answers(
    State(db): State<Database>,
    State(config): State<Config>,
    payload: Result<Json<AnswersInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let answers = scoring::validate_prediction_map(&payload.answers)?;

    let saved = db
        .save_correct_answers(CorrectAnswers {
            answers,
            reveal_date: config.reveal_date,
            updated_at: Utc::now(),
        })
        .await?;
    tracing::info!("Correct answers updated");

    Ok(Json(ApiResponse::with_message(
        "Correct answers saved successfully",
        saved,
    )))
}

/// Sets the quiz answer key.
/// Admin only. Replaces any previous key.
pub async fn set_quiz_correct_answers(
    State(db): State<Database>,
    payload: Result<Json<QuizAnswersInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let answers = scoring::validate_quiz_key(&payload.answers)?;

    let saved = db
        .save_quiz_correct_answers(QuizCorrectAnswers {
            answers,
            updated_at: Utc::now(),
        })
        .await?;
    tracing::info!("Quiz answer key updated ({} questions)", saved.answers.len());

    Ok(Json(ApiResponse::with_message(
        "Quiz correct answers saved successfully",
        saved,
    )))
}

/// Lists every quiz question with the answer currently in force.
/// Admin only.
pub async fn list_questions(State(db): State<Database>) -> Result<impl IntoResponse, AppError> {
    let quiz_key = db.get_quiz_correct_answers().await?;

    let questions: Vec<AdminQuestion> = catalog()
        .iter()
        .map(|q| AdminQuestion {
            id: q.id,
            question: q.question,
            options: q.options,
            correct_answer: quiz_key
                .as_ref()
                .and_then(|k| k.answers.get(&q.id).cloned())
                .unwrap_or_else(|| q.correct_answer.to_string()),
        })
        .collect();

    Ok(Json(ApiResponse::data(questions)))
}
