//! Fields computed from the question set.

use quizhub_entity::quiz::{Difficulty, Question, QuestionKind};

/// Estimated completion time in whole minutes (0 for an empty quiz).
pub fn estimated_time_minutes(questions: &[Question]) -> u32 {
    if questions.is_empty() {
        return 0;
    }
    let seconds: usize = questions.iter().map(question_seconds).sum();
    seconds.div_ceil(60).max(1) as u32
}

fn question_seconds(question: &Question) -> usize {
    let base = match question.kind {
        QuestionKind::MultipleChoice => 30 + 5 * question.options.len().saturating_sub(2),
        QuestionKind::TrueFalse => 15,
        QuestionKind::ShortAnswer => 60,
        QuestionKind::Essay => 180,
    };
    base + question.prompt.chars().count() / 20
}

/// Difficulty from the average per-question score.
pub fn difficulty(questions: &[Question]) -> Difficulty {
    if questions.is_empty() {
        return Difficulty::Easy;
    }
    let total: u32 = questions.iter().map(question_score).sum();
    let average = f64::from(total) / questions.len() as f64;

    if average < 1.75 {
        Difficulty::Easy
    } else if average < 2.75 {
        Difficulty::Medium
    } else {
        Difficulty::Hard
    }
}

fn question_score(question: &Question) -> u32 {
    let base = match question.kind {
        QuestionKind::TrueFalse => 1,
        QuestionKind::MultipleChoice if question.correct_answers.len() > 1 => 3,
        QuestionKind::MultipleChoice => 2,
        QuestionKind::ShortAnswer => 3,
        QuestionKind::Essay => 4,
    };
    if question.prompt.chars().count() > 200 {
        base + 1
    } else {
        base
    }
}
