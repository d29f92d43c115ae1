// src/scoring.rs

//! Validation of incoming predictions and answers, and score arithmetic.
//! Everything here is pure; handlers fetch the records and pass them in.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
};

use chrono::{DateTime, Utc};

use crate::{
    error::AppError,
    models::{
        answers::{CorrectAnswers, QuizCorrectAnswers},
        participant::{Participant, PredictionMap},
        question::{QuestionId, QuizQuestion, find_question},
        score::{CombinedScore, PredictionScore, QuizScore, ScoreboardEntry},
        submission::{QuizAnswer, UserSubmission},
    },
};

/// Parses a player name, rejecting anyone outside the roster.
pub fn parse_participant(name: &str) -> Result<Participant, AppError> {
    name.parse().map_err(|_| {
        AppError::BadRequest(format!(
            "Invalid userName. Must be one of: {}",
            Participant::roster_list()
        ))
    })
}

/// Checks a raw giver -> receiver map against the roster.
///
/// The keys must be exactly the roster, nobody may give to themselves and
/// every receiver must be on the roster.
pub fn validate_prediction_map(raw: &HashMap<String, String>) -> Result<PredictionMap, AppError> {
    let covers_roster = raw.len() == Participant::ALL.len()
        && Participant::ALL.iter().all(|p| raw.contains_key(p.name()));
    if !covers_roster {
        return Err(AppError::BadRequest(format!(
            "predictions must contain all participants: {}",
            Participant::roster_list()
        )));
    }

    let mut map = PredictionMap::new();
    for giver in Participant::ALL {
        let receiver_name = &raw[giver.name()];
        let receiver: Participant = receiver_name
            .parse()
            .map_err(|_| AppError::BadRequest(format!("Invalid receiver: {}", receiver_name)))?;
        if receiver == giver {
            return Err(AppError::BadRequest(format!(
                "{} cannot give to themselves",
                giver
            )));
        }
        map.insert(giver, receiver);
    }

    Ok(map)
}

pub fn parse_question(raw: &str) -> Result<&'static QuizQuestion, AppError> {
    let id: QuestionId = raw.parse().map_err(AppError::BadRequest)?;
    Ok(find_question(id))
}

/// The answer must be one of the question's options.
pub fn validate_quiz_answer(question: &QuizQuestion, answer: &str) -> Result<(), AppError> {
    if question.has_option(answer) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "'{}' is not an option for question {}",
            answer, question.id
        )))
    }
}

/// Each question may be answered once; a second attempt is a conflict,
/// not an update.
pub fn ensure_unanswered(submission: &UserSubmission, question: QuestionId) -> Result<(), AppError> {
    if submission.has_answered(question) {
        Err(AppError::Conflict(format!(
            "Question {} has already been answered",
            question
        )))
    } else {
        Ok(())
    }
}

/// Validates an admin quiz answer key (question id -> option text).
pub fn validate_quiz_key(
    raw: &HashMap<String, String>,
) -> Result<BTreeMap<QuestionId, String>, AppError> {
    if raw.is_empty() {
        return Err(AppError::BadRequest(
            "answers must contain at least one question".to_string(),
        ));
    }

    let mut key = BTreeMap::new();
    for (question_id, answer) in raw {
        let question = parse_question(question_id)?;
        validate_quiz_answer(question, answer)?;
        key.insert(question.id, answer.clone());
    }
    Ok(key)
}

/// Whether a freshly submitted answer is right. The admin key wins; the
/// catalog default applies while no key has been set for the question.
pub fn is_answer_correct(
    question: &QuizQuestion,
    answer: &str,
    key: Option<&QuizCorrectAnswers>,
) -> bool {
    key.and_then(|k| k.answers.get(&question.id))
        .map(String::as_str)
        .unwrap_or(question.correct_answer)
        == answer
}

/// `correct / total` as a percentage rounded to two decimals; 0 when total is 0.
pub fn percentage(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = correct as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

/// (correct, total) over the givers of the player's map.
fn count_predictions(predictions: &PredictionMap, correct: &PredictionMap) -> (usize, usize) {
    let hits = predictions
        .iter()
        .filter(|&(giver, receiver)| correct.get(giver) == Some(receiver))
        .count();
    (hits, predictions.len())
}

/// (correct, total) over the answered questions the key covers.
fn count_quiz(answers: &[QuizAnswer], key: &QuizCorrectAnswers) -> (usize, usize) {
    answers
        .iter()
        .filter_map(|a| key.answers.get(&a.question_id).map(|right| *right == a.answer))
        .fold((0, 0), |(hits, total), ok| (hits + usize::from(ok), total + 1))
}

pub fn score_predictions(
    user_name: Participant,
    predictions: &PredictionMap,
    correct: &PredictionMap,
) -> PredictionScore {
    let (correct_predictions, total_predictions) = count_predictions(predictions, correct);
    PredictionScore {
        user_name,
        correct_predictions,
        total_predictions,
        score: percentage(correct_predictions, total_predictions),
    }
}

/// Prediction scores of every player who submitted predictions, best first.
pub fn prediction_scores(
    submissions: &[UserSubmission],
    correct: &CorrectAnswers,
) -> Vec<PredictionScore> {
    let mut scores: Vec<PredictionScore> = submissions
        .iter()
        .filter_map(|s| {
            s.predictions
                .as_ref()
                .map(|p| score_predictions(s.user_name, p, &correct.answers))
        })
        .collect();

    scores.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.user_name.cmp(&b.user_name))
    });
    scores
}

pub fn score_quiz(
    user_name: Participant,
    answers: &[QuizAnswer],
    key: Option<&QuizCorrectAnswers>,
) -> QuizScore {
    let (correct_answers, total_answers) = key.map(|k| count_quiz(answers, k)).unwrap_or((0, 0));
    QuizScore {
        user_name,
        correct_answers,
        total_answers,
        score: percentage(correct_answers, total_answers),
        has_admin_answers: key.is_some(),
    }
}

/// Quiz and prediction counts are summed before the percentage is taken.
/// A part only counts once its answer key exists.
pub fn combined_score(
    user_name: Participant,
    submission: Option<&UserSubmission>,
    correct: Option<&CorrectAnswers>,
    quiz_key: Option<&QuizCorrectAnswers>,
) -> CombinedScore {
    let (quiz_correct, quiz_total) = match (submission, quiz_key) {
        (Some(s), Some(key)) => count_quiz(&s.quiz_answers, key),
        _ => (0, 0),
    };
    let (predictions_correct, predictions_total) =
        match (submission.and_then(|s| s.predictions.as_ref()), correct) {
            (Some(predictions), Some(correct)) => count_predictions(predictions, &correct.answers),
            _ => (0, 0),
        };

    let total_correct = quiz_correct + predictions_correct;
    let total_questions = quiz_total + predictions_total;

    CombinedScore {
        user_name,
        quiz_correct,
        quiz_total,
        predictions_correct,
        predictions_total,
        total_correct,
        total_questions,
        score: percentage(total_correct, total_questions),
        has_admin_answers: correct.is_some() || quiz_key.is_some(),
    }
}

/// Ranks every player with a submission by combined score; equal scores
/// go to whoever got more items right.
pub fn scoreboard(
    submissions: &[UserSubmission],
    correct: Option<&CorrectAnswers>,
    quiz_key: Option<&QuizCorrectAnswers>,
) -> Vec<ScoreboardEntry> {
    let mut scores: Vec<CombinedScore> = submissions
        .iter()
        .map(|s| combined_score(s.user_name, Some(s), correct, quiz_key))
        .collect();

    scores.sort_by(compare_combined);

    scores
        .into_iter()
        .enumerate()
        .map(|(i, s)| ScoreboardEntry {
            rank: i + 1,
            user_name: s.user_name,
            total_correct: s.total_correct,
            total_questions: s.total_questions,
            quiz_correct: s.quiz_correct,
            quiz_total: s.quiz_total,
            predictions_correct: s.predictions_correct,
            predictions_total: s.predictions_total,
            score: s.score,
        })
        .collect()
}

fn compare_combined(a: &CombinedScore, b: &CombinedScore) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.total_correct.cmp(&a.total_correct))
        .then_with(|| a.user_name.cmp(&b.user_name))
}

/// Refuses with `NotRevealed` strictly before `reveal_date`.
pub fn ensure_revealed(
    now: DateTime<Utc>,
    reveal_date: DateTime<Utc>,
    what: &str,
) -> Result<(), AppError> {
    if now < reveal_date {
        return Err(AppError::NotRevealed {
            message: format!(
                "{} cannot be revealed until {}",
                what,
                reveal_date.format("%B %-d, %Y")
            ),
            reveal_date,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use Participant::*;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Everyone gives to the next participant in roster order.
    fn rotation() -> HashMap<String, String> {
        let all = Participant::ALL;
        (0..all.len())
            .map(|i| {
                (
                    all[i].name().to_string(),
                    all[(i + 1) % all.len()].name().to_string(),
                )
            })
            .collect()
    }

    fn submission(user: Participant, predictions: Option<PredictionMap>) -> UserSubmission {
        let mut s = UserSubmission::new(user);
        s.predictions = predictions;
        s
    }

    fn quiz_answer(id: QuestionId, answer: &str) -> QuizAnswer {
        QuizAnswer {
            question_id: id,
            answer: answer.to_string(),
            timestamp: Utc::now(),
        }
    }

    fn quiz_key(pairs: &[(QuestionId, &str)]) -> QuizCorrectAnswers {
        QuizCorrectAnswers {
            answers: pairs.iter().map(|(id, a)| (*id, a.to_string())).collect(),
            updated_at: Utc::now(),
        }
    }

    fn correct(map: PredictionMap) -> CorrectAnswers {
        CorrectAnswers {
            answers: map,
            reveal_date: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn accepts_full_roster_without_self_gifts() {
        let map = validate_prediction_map(&rotation()).unwrap();
        assert_eq!(map.len(), 7);
        assert_eq!(map[&Miriam], Paula);
        assert_eq!(map[&Padrino], Miriam);
    }

    #[test]
    fn accepts_non_injective_maps() {
        let mut input = rotation();
        input.insert("Paula".into(), "Miriam".into());
        input.insert("Adriana".into(), "Miriam".into());
        assert!(validate_prediction_map(&input).is_ok());
    }

    #[test]
    fn rejects_missing_or_extra_givers() {
        let mut missing = rotation();
        missing.remove("Lula");
        assert!(matches!(
            validate_prediction_map(&missing),
            Err(AppError::BadRequest(_))
        ));

        let mut extra = rotation();
        extra.insert("Santa".into(), "Lula".into());
        assert!(matches!(
            validate_prediction_map(&extra),
            Err(AppError::BadRequest(_))
        ));

        let mut renamed = rotation();
        let receiver = renamed.remove("Carlos A").unwrap();
        renamed.insert("Carlos".into(), receiver);
        assert!(validate_prediction_map(&renamed).is_err());
    }

    #[test]
    fn rejects_self_gift_and_unknown_receiver() {
        let mut selfish = rotation();
        selfish.insert("Diego".into(), "Diego".into());
        match validate_prediction_map(&selfish) {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Diego cannot give to themselves"),
            other => panic!("unexpected {:?}", other),
        }

        let mut stranger = rotation();
        stranger.insert("Diego".into(), "Rudolph".into());
        match validate_prediction_map(&stranger) {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Invalid receiver: Rudolph"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(7, 7), 100.0);
        assert_eq!(percentage(0, 7), 0.0);
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 6), 16.67);
    }

    #[test]
    fn counts_matching_givers() {
        let user: PredictionMap = [(Miriam, Paula), (Paula, Adriana), (Adriana, Miriam)].into();
        let answers: PredictionMap = [(Miriam, Paula), (Paula, Miriam), (Adriana, Miriam)].into();

        let score = score_predictions(Lula, &user, &answers);
        assert_eq!(score.correct_predictions, 2);
        assert_eq!(score.total_predictions, 3);
        assert_eq!(score.score, 66.67);
    }

    #[test]
    fn prediction_scores_skip_quiz_only_players_and_sort_descending() {
        let truth = validate_prediction_map(&rotation()).unwrap();
        let mut half = truth.clone();
        half.insert(Miriam, Lula);
        half.insert(Paula, Lula);

        let subs = vec![
            submission(Paula, Some(half)),
            submission(Diego, None),
            submission(Lula, Some(truth.clone())),
        ];
        let scores = prediction_scores(&subs, &correct(truth));

        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].user_name, Lula);
        assert_eq!(scores[0].score, 100.0);
        assert_eq!(scores[1].correct_predictions, 5);
    }

    #[test]
    fn duplicate_question_is_a_conflict() {
        let mut s = submission(Miriam, None);
        assert!(ensure_unanswered(&s, QuestionId::Q1).is_ok());
        s.quiz_answers.push(quiz_answer(QuestionId::Q1, "China"));
        assert!(matches!(
            ensure_unanswered(&s, QuestionId::Q1),
            Err(AppError::Conflict(_))
        ));
        assert!(ensure_unanswered(&s, QuestionId::Q2).is_ok());
    }

    #[test]
    fn quiz_answers_must_be_known_options() {
        let question = parse_question("q2").unwrap();
        assert!(validate_quiz_answer(question, "1989").is_ok());
        assert!(validate_quiz_answer(question, "1990").is_err());
        assert!(parse_question("q42").is_err());
    }

    #[test]
    fn quiz_key_validation() {
        let key = validate_quiz_key(&raw(&[("q1", "India"), ("q3", "Pacífico")])).unwrap();
        assert_eq!(key.len(), 2);
        assert_eq!(key[&QuestionId::Q1], "India");

        assert!(validate_quiz_key(&HashMap::new()).is_err());
        assert!(validate_quiz_key(&raw(&[("q1", "Narnia")])).is_err());
        assert!(validate_quiz_key(&raw(&[("q7", "India")])).is_err());
    }

    #[test]
    fn admin_key_overrides_catalog_answer() {
        let question = find_question(QuestionId::Q1);
        assert!(is_answer_correct(question, "China", None));
        assert!(!is_answer_correct(question, "India", None));

        let key = quiz_key(&[(QuestionId::Q1, "India")]);
        assert!(is_answer_correct(question, "India", Some(&key)));
        assert!(!is_answer_correct(question, "China", Some(&key)));

        // A key without this question falls back to the catalog.
        let other = quiz_key(&[(QuestionId::Q2, "1989")]);
        assert!(is_answer_correct(question, "China", Some(&other)));
    }

    #[test]
    fn quiz_score_only_counts_keyed_questions() {
        let answers = vec![
            quiz_answer(QuestionId::Q1, "China"),
            quiz_answer(QuestionId::Q2, "1987"),
            quiz_answer(QuestionId::Q3, "Pacífico"),
        ];

        let unset = score_quiz(Paula, &answers, None);
        assert_eq!((unset.correct_answers, unset.total_answers), (0, 0));
        assert_eq!(unset.score, 0.0);
        assert!(!unset.has_admin_answers);

        let key = quiz_key(&[(QuestionId::Q1, "China"), (QuestionId::Q2, "1989")]);
        let score = score_quiz(Paula, &answers, Some(&key));
        assert_eq!((score.correct_answers, score.total_answers), (1, 2));
        assert_eq!(score.score, 50.0);
        assert!(score.has_admin_answers);
    }

    #[test]
    fn combined_sums_counts_before_percentage() {
        let truth = validate_prediction_map(&rotation()).unwrap();
        let mut guess = truth.clone();
        guess.insert(Miriam, Diego);
        guess.insert(Paula, Diego);
        guess.insert(Adriana, Diego);

        let mut s = submission(Miriam, Some(guess));
        s.quiz_answers.push(quiz_answer(QuestionId::Q1, "China"));
        s.quiz_answers.push(quiz_answer(QuestionId::Q2, "1993"));

        let key = quiz_key(&[(QuestionId::Q1, "China"), (QuestionId::Q2, "1989")]);
        let answers = correct(truth);
        let combined = combined_score(Miriam, Some(&s), Some(&answers), Some(&key));

        assert_eq!((combined.quiz_correct, combined.quiz_total), (1, 2));
        assert_eq!((combined.predictions_correct, combined.predictions_total), (4, 7));
        assert_eq!((combined.total_correct, combined.total_questions), (5, 9));
        assert_eq!(combined.score, 55.56);
        assert!(combined.has_admin_answers);
    }

    #[test]
    fn combined_without_keys_reports_missing_admin_answers() {
        let s = submission(Lula, validate_prediction_map(&rotation()).ok());
        let combined = combined_score(Lula, Some(&s), None, None);
        assert_eq!(combined.total_questions, 0);
        assert_eq!(combined.score, 0.0);
        assert!(!combined.has_admin_answers);

        let nobody = combined_score(Diego, None, None, Some(&quiz_key(&[])));
        assert!(nobody.has_admin_answers);
        assert_eq!(nobody.score, 0.0);
    }

    #[test]
    fn scoreboard_breaks_score_ties_by_correct_total() {
        let key = quiz_key(&[
            (QuestionId::Q1, "China"),
            (QuestionId::Q2, "1989"),
            (QuestionId::Q3, "Pacífico"),
        ]);

        // 1 of 1 correct: 100%.
        let mut one = submission(Adriana, None);
        one.quiz_answers.push(quiz_answer(QuestionId::Q1, "China"));

        // 3 of 3 correct: also 100%, more items right.
        let mut three = submission(Padrino, None);
        three.quiz_answers.push(quiz_answer(QuestionId::Q1, "China"));
        three.quiz_answers.push(quiz_answer(QuestionId::Q2, "1989"));
        three.quiz_answers.push(quiz_answer(QuestionId::Q3, "Pacífico"));

        // 1 of 2 correct: 50%.
        let mut half = submission(Miriam, None);
        half.quiz_answers.push(quiz_answer(QuestionId::Q1, "China"));
        half.quiz_answers.push(quiz_answer(QuestionId::Q2, "1991"));

        let board = scoreboard(&[one, half, three], None, Some(&key));
        let order: Vec<_> = board.iter().map(|e| e.user_name).collect();
        assert_eq!(order, vec![Padrino, Adriana, Miriam]);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].total_correct, 3);
        assert_eq!(board[0].quiz_total, 3);
        assert_eq!(board[0].predictions_total, 0);
        assert_eq!(board[2].quiz_correct, 1);
        assert_eq!(board[2].quiz_total, 2);
        assert_eq!(board[2].score, 50.0);
    }

    #[test]
    fn reveal_gate_opens_at_the_reveal_instant() {
        let reveal = Utc::now();
        let before = reveal - chrono::Duration::milliseconds(1);

        match ensure_revealed(before, reveal, "Scores") {
            Err(AppError::NotRevealed { reveal_date, .. }) => assert_eq!(reveal_date, reveal),
            other => panic!("unexpected {:?}", other),
        }
        assert!(ensure_revealed(reveal, reveal, "Scores").is_ok());
        assert!(ensure_revealed(reveal + chrono::Duration::days(1), reveal, "Scores").is_ok());
    }
}
