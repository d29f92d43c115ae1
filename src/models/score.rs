// src/models/score.rs

use serde::Serialize;

use super::participant::Participant;

/// Prediction-only score for one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionScore {
    pub user_name: Participant,
    pub correct_predictions: usize,
    pub total_predictions: usize,
    pub score: f64,
}

/// Quiz-only score for one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScore {
    pub user_name: Participant,
    pub correct_answers: usize,
    pub total_answers: usize,
    pub score: f64,
    pub has_admin_answers: bool,
}

/// Quiz and prediction results folded into one percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedScore {
    pub user_name: Participant,
    pub quiz_correct: usize,
    pub quiz_total: usize,
    pub predictions_correct: usize,
    pub predictions_total: usize,
    pub total_correct: usize,
    pub total_questions: usize,
    pub score: f64,
    pub has_admin_answers: bool,
}

/// A ranked scoreboard row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreboardEntry {
    pub rank: usize,
    pub user_name: Participant,
    pub total_correct: usize,
    pub total_questions: usize,
    pub quiz_correct: usize,
    pub quiz_total: usize,
    pub predictions_correct: usize,
    pub predictions_total: usize,
    pub score: f64,
}
