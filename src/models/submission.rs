// src/models/submission.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{
    participant::{Participant, PredictionMap},
    question::QuestionId,
};

/// Everything a single player has submitted: their pairing guesses and
/// their quiz answers. Stored as one `user_submission` document per player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSubmission {
    /// Document id, always `user_<name>`.
    pub id: String,
    pub user_name: Participant,
    #[serde(default)]
    pub predictions: Option<PredictionMap>,
    /// Answers in the order they were submitted.
    #[serde(default)]
    pub quiz_answers: Vec<QuizAnswer>,
    /// First submission time.
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserSubmission {
    pub fn new(user_name: Participant) -> Self {
        let now = Utc::now();
        Self {
            id: submission_id(user_name),
            user_name,
            predictions: None,
            quiz_answers: Vec::new(),
            timestamp: now,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_answered(&self, question: QuestionId) -> bool {
        self.quiz_answers.iter().any(|a| a.question_id == question)
    }
}

/// Document id of a player's submission.
pub fn submission_id(user_name: Participant) -> String {
    format!("user_{}", user_name)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub question_id: QuestionId,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}

/// DTO for submitting (or replacing) a player's predictions.
///
/// Names are kept as raw strings so roster violations can be reported
/// with a readable message instead of a deserialization error.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PredictionInput {
    #[validate(length(min = 1, max = 50))]
    pub user_name: String,
    pub predictions: HashMap<String, String>,
}

/// DTO for answering one quiz question.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswerInput {
    #[validate(length(min = 1, max = 50))]
    pub user_name: String,
    #[validate(length(min = 1, max = 20))]
    pub question_id: String,
    /// Checked against the question's options once the question is known
    /// to be unanswered.
    pub answer: String,
}

/// Query string for the question listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsQuery {
    pub user_name: Option<String>,
}

/// Prediction view returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionView {
    pub id: String,
    pub user_name: Participant,
    pub predictions: PredictionMap,
    pub timestamp: DateTime<Utc>,
}

impl PredictionView {
    /// `None` when the player has not submitted predictions yet.
    pub fn from_submission(submission: &UserSubmission) -> Option<Self> {
        submission.predictions.as_ref().map(|predictions| Self {
            id: submission.id.clone(),
            user_name: submission.user_name,
            predictions: predictions.clone(),
            timestamp: submission.timestamp,
        })
    }
}

/// One row of the roster status listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStatus {
    pub user_name: Participant,
    pub has_submitted: bool,
    pub submitted_at: Option<DateTime<Utc>>,
}
