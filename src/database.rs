// src/database.rs

//! Typed records on top of the document store.
//!
//! Submissions live under `user_submission`, the correct pairing under
//! `answers` and the quiz answer key under `quiz_answers`.

use std::sync::Arc;

use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    error::AppError,
    models::{
        answers::{CorrectAnswers, QuizCorrectAnswers},
        participant::{Participant, PredictionMap},
        question::QuizQuestion,
        submission::{ParticipantStatus, QuizAnswer, UserSubmission, submission_id},
    },
    scoring,
    store::{DocumentKind, DocumentStore},
};

pub const CORRECT_ANSWERS_ID: &str = "correct_answers";
pub const QUIZ_CORRECT_ANSWERS_ID: &str = "quiz_correct_answers";

#[derive(Clone)]
pub struct Database {
    store: Arc<dyn DocumentStore>,
}

impl Database {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Looks up a player's submission, `None` if they never submitted.
    pub async fn find_submission(
        &self,
        user_name: Participant,
    ) -> Result<Option<UserSubmission>, AppError> {
        self.read(DocumentKind::UserSubmission, &submission_id(user_name))
            .await
    }

    pub async fn get_submission(&self, user_name: Participant) -> Result<UserSubmission, AppError> {
        self.find_submission(user_name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No submission found for {}", user_name)))
    }

    /// Upserts the submission.
    ///
    /// An existing record keeps its id and creation time; a new one gets
    /// all three timestamps set to now.
    pub async fn save_submission(
        &self,
        mut submission: UserSubmission,
    ) -> Result<UserSubmission, AppError> {
        let now = Utc::now();

        match self.find_submission(submission.user_name).await? {
            Some(existing) => {
                submission.id = existing.id;
                submission.created_at = existing.created_at;
                submission.updated_at = now;
            }
            None => {
                submission.id = submission_id(submission.user_name);
                submission.timestamp = now;
                submission.created_at = now;
                submission.updated_at = now;
            }
        }

        self.write(DocumentKind::UserSubmission, &submission.id, &submission)
            .await?;
        tracing::debug!("Saved submission {}", submission.id);

        Ok(submission)
    }

    pub async fn list_submissions(&self) -> Result<Vec<UserSubmission>, AppError> {
        self.store
            .query(DocumentKind::UserSubmission)
            .await?
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(AppError::from))
            .collect()
    }

    /// Replaces the player's predictions, creating their submission if needed.
    pub async fn save_predictions(
        &self,
        user_name: Participant,
        predictions: PredictionMap,
    ) -> Result<UserSubmission, AppError> {
        let mut submission = self
            .find_submission(user_name)
            .await?
            .unwrap_or_else(|| UserSubmission::new(user_name));

        submission.predictions = Some(predictions);
        self.save_submission(submission).await
    }

    /// Appends a quiz answer.
    ///
    /// Fails with `Conflict` if the question was already answered by this
    /// player, before the answer itself is looked at; only a first answer
    /// is checked against the question's options.
    pub async fn save_quiz_answer(
        &self,
        user_name: Participant,
        question: &QuizQuestion,
        answer: String,
    ) -> Result<QuizAnswer, AppError> {
        let mut submission = self
            .find_submission(user_name)
            .await?
            .unwrap_or_else(|| UserSubmission::new(user_name));

        scoring::ensure_unanswered(&submission, question.id)?;
        scoring::validate_quiz_answer(question, &answer)?;

        let quiz_answer = QuizAnswer {
            question_id: question.id,
            answer,
            timestamp: Utc::now(),
        };
        submission.quiz_answers.push(quiz_answer.clone());
        self.save_submission(submission).await?;

        Ok(quiz_answer)
    }

    /// Roster in display order with each player's prediction status.
    pub async fn participants_status(&self) -> Result<Vec<ParticipantStatus>, AppError> {
        let submissions = self.list_submissions().await?;

        Ok(Participant::ALL
            .into_iter()
            .map(|participant| {
                let submitted = submissions
                    .iter()
                    .find(|s| s.user_name == participant && s.predictions.is_some());
                ParticipantStatus {
                    user_name: participant,
                    has_submitted: submitted.is_some(),
                    submitted_at: submitted.map(|s| s.timestamp),
                }
            })
            .collect())
    }

    pub async fn get_correct_answers(&self) -> Result<Option<CorrectAnswers>, AppError> {
        self.read(DocumentKind::Answers, CORRECT_ANSWERS_ID).await
    }

    pub async fn save_correct_answers(
        &self,
        mut answers: CorrectAnswers,
    ) -> Result<CorrectAnswers, AppError> {
        answers.updated_at = Utc::now();
        self.write(DocumentKind::Answers, CORRECT_ANSWERS_ID, &answers)
            .await?;
        Ok(answers)
    }

    pub async fn get_quiz_correct_answers(&self) -> Result<Option<QuizCorrectAnswers>, AppError> {
        self.read(DocumentKind::QuizAnswers, QUIZ_CORRECT_ANSWERS_ID)
            .await
    }

    pub async fn save_quiz_correct_answers(
        &self,
        mut answers: QuizCorrectAnswers,
    ) -> Result<QuizCorrectAnswers, AppError> {
        answers.updated_at = Utc::now();
        self.write(DocumentKind::QuizAnswers, QUIZ_CORRECT_ANSWERS_ID, &answers)
            .await?;
        Ok(answers)
    }

    async fn read<T: DeserializeOwned>(
        &self,
        kind: DocumentKind,
        id: &str,
    ) -> Result<Option<T>, AppError> {
        match self.store.read(kind, id).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    async fn write<T: Serialize>(
        &self,
        kind: DocumentKind,
        id: &str,
        record: &T,
    ) -> Result<(), AppError> {
        let document = to_document(kind, id, record)?;
        self.store.upsert(kind, id, document).await
    }
}

/// Serializes a record and stamps it with its `id` and `type` fields.
fn to_document<T: Serialize>(kind: DocumentKind, id: &str, record: &T) -> Result<Value, AppError> {
    let mut document = serde_json::to_value(record)?;
    match document.as_object_mut() {
        Some(fields) => {
            fields.insert("id".to_string(), Value::from(id));
            fields.insert("type".to_string(), Value::from(kind.as_str()));
            Ok(document)
        }
        None => Err(AppError::InternalServerError(format!(
            "{} record '{}' did not serialize to an object",
            kind, id
        ))),
    }
}
