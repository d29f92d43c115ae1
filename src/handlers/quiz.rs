// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    database::Database,
    error::AppError,
    models::{
        question::{PublicQuestion, catalog},
        response::ApiResponse,
        submission::{QuestionsQuery, QuizAnswerInput},
    },
    scoring,
};

/// Lists the quiz questions without their answers.
///
/// With `?userName=` only the questions that player has not answered yet
/// are returned, so an interrupted quiz resumes where it stopped.
pub async fn list_questions(
    State(db): State<Database>,
    Query(query): Query<QuestionsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let submission = match query.user_name.as_deref() {
        Some(name) => db.find_submission(scoring::parse_participant(name)?).await?,
        None => None,
    };

    let questions: Vec<PublicQuestion> = catalog()
        .iter()
        .filter(|q| !submission.as_ref().is_some_and(|s| s.has_answered(q.id)))
        .map(PublicQuestion::from)
        .collect();

    Ok(Json(ApiResponse::data(questions)))
}

/// Records a player's answer to one question.
///
/// * Rejects unknown players and questions.
/// * A second answer to the same question is a 409 Conflict, whatever it says.
/// * Otherwise the answer must be one of the options.
/// * Reports whether the answer is correct.
pub async fn submit_answer(
    State(db): State<Database>,
    payload: Result<Json<QuizAnswerInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let user_name = scoring::parse_participant(&payload.user_name)?;
    let question = scoring::parse_question(&payload.question_id)?;

    let saved = db
        .save_quiz_answer(user_name, question, payload.answer)
        .await
        .inspect_err(|e| {
            if matches!(e, AppError::Conflict(_)) {
                tracing::warn!("{} tried to answer {} twice", user_name, question.id);
            }
        })?;

    let quiz_key = db.get_quiz_correct_answers().await?;
    let is_correct = scoring::is_answer_correct(question, &saved.answer, quiz_key.as_ref());

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Answer saved successfully",
            "data": {
                "questionId": saved.question_id,
                "answer": saved.answer,
                "isCorrect": is_correct,
                "timestamp": saved.timestamp,
            }
        })),
    ))
}

/// Quiz score of one player against the admin answer key.
pub async fn get_quiz_score(
    State(db): State<Database>,
    Path(user_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_name = scoring::parse_participant(&user_name)?;

    let submission = db.find_submission(user_name).await?;
    let quiz_key = db.get_quiz_correct_answers().await?;

    let answers = submission
        .as_ref()
        .map(|s| s.quiz_answers.as_slice())
        .unwrap_or_default();
    let score = scoring::score_quiz(user_name, answers, quiz_key.as_ref());

    Ok(Json(ApiResponse::data(score)))
}
