// src/models/question.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Identifier of a quiz question. The question set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionId {
    Q1,
    Q2,
    Q3,
}

impl QuestionId {
    pub const ALL: [QuestionId; 3] = [QuestionId::Q1, QuestionId::Q2, QuestionId::Q3];

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionId::Q1 => "q1",
            QuestionId::Q2 => "q2",
            QuestionId::Q3 => "q3",
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("Unknown question '{}'", s))
    }
}

/// A trivia question from the built-in catalog.
#[derive(Debug, Clone, Copy)]
pub struct QuizQuestion {
    pub id: QuestionId,
    pub question: &'static str,
    pub options: &'static [&'static str],
    /// Default answer, used only until an admin sets the quiz answer key.
    pub correct_answer: &'static str,
}

impl QuizQuestion {
    pub fn has_option(&self, answer: &str) -> bool {
        self.options.contains(&answer)
    }
}

static CATALOG: [QuizQuestion; 3] = [
    QuizQuestion {
        id: QuestionId::Q1,
        question: "¿Cuál es el país más poblado del mundo?",
        options: &["India", "Estados Unidos", "China", "Indonesia"],
        correct_answer: "China",
    },
    QuizQuestion {
        id: QuestionId::Q2,
        question: "¿En qué año cayó el Muro de Berlín?",
        options: &["1987", "1989", "1991", "1993"],
        correct_answer: "1989",
    },
    QuizQuestion {
        id: QuestionId::Q3,
        question: "¿Cuál es el océano más grande?",
        options: &["Atlántico", "Índico", "Ártico", "Pacífico"],
        correct_answer: "Pacífico",
    },
];

/// All quiz questions, in presentation order.
pub fn catalog() -> &'static [QuizQuestion] {
    &CATALOG
}

pub fn find_question(id: QuestionId) -> &'static QuizQuestion {
    // Every QuestionId variant has exactly one catalog entry.
    match id {
        QuestionId::Q1 => &CATALOG[0],
        QuestionId::Q2 => &CATALOG[1],
        QuestionId::Q3 => &CATALOG[2],
    }
}

/// DTO for sending a question to players (excludes the answer).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: QuestionId,
    pub question: &'static str,
    pub options: &'static [&'static str],
}

impl From<&QuizQuestion> for PublicQuestion {
    fn from(q: &QuizQuestion) -> Self {
        Self {
            id: q.id,
            question: q.question,
            options: q.options,
        }
    }
}

/// DTO for the admin panel: the question with the answer currently in force.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminQuestion {
    pub id: QuestionId,
    pub question: &'static str,
    pub options: &'static [&'static str],
    pub correct_answer: String,
}
