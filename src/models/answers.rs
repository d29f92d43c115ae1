// src/models/answers.rs

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{participant::PredictionMap, question::QuestionId};

/// The real gift-exchange pairing, set by an admin. Only one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectAnswers {
    pub answers: PredictionMap,
    pub reveal_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Answer key for the quiz, set by an admin. Only one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizCorrectAnswers {
    pub answers: BTreeMap<QuestionId, String>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for setting the correct pairing.
#[derive(Debug, Deserialize)]
pub struct AnswersInput {
    pub answers: HashMap<String, String>,
}

/// DTO for setting the quiz answer key (question id -> option text).
#[derive(Debug, Deserialize)]
pub struct QuizAnswersInput {
    pub answers: HashMap<String, String>,
}
