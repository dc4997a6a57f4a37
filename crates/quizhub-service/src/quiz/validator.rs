//! Structural question validation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use quizhub_core::error::AppError;
use quizhub_core::result::AppResult;
use quizhub_entity::quiz::{Question, QuestionKind};

/// Outcome of validating a question set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether the question set is acceptable.
    pub is_valid: bool,
    /// Human-readable problems, in question order.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Build a report from collected errors.
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Convert into a single validation error joining every problem.
    pub fn into_result(self) -> AppResult<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(AppError::validation(self.errors.join("; ")))
        }
    }
}

/// Validates the structure of a quiz's questions.
pub trait QuizValidator: Send + Sync {
    /// Check every question and report all problems found.
    fn validate_questions(&self, questions: &[Question]) -> ValidationReport;
}

/// Default validator enforcing per-kind structural rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralQuizValidator;

impl QuizValidator for StructuralQuizValidator {
    fn validate_questions(&self, questions: &[Question]) -> ValidationReport {
        let mut errors = Vec::new();
        if questions.is_empty() {
            errors.push("Quiz must have at least one question".to_string());
        }

        let mut ids = HashSet::new();
        for (index, question) in questions.iter().enumerate() {
            let n = index + 1;
            if question.id.trim().is_empty() {
                errors.push(format!("Question {n}: id is required"));
            } else if !ids.insert(question.id.as_str()) {
                errors.push(format!("Question {n}: duplicate id '{}'", question.id));
            }
            if question.prompt.trim().is_empty() {
                errors.push(format!("Question {n}: prompt is required"));
            }
            if question.points < 1 {
                errors.push(format!("Question {n}: points must be at least 1"));
            }
            check_kind(n, question, &mut errors);
        }

        ValidationReport::from_errors(errors)
    }
}

fn check_kind(n: usize, question: &Question, errors: &mut Vec<String>) {
    match question.kind {
        QuestionKind::MultipleChoice => {
            let filled = question.options.iter().filter(|o| !o.trim().is_empty()).count();
            if question.options.len() < 2 || filled != question.options.len() {
                errors.push(format!(
                    "Question {n}: multiple choice needs at least 2 non-empty options"
                ));
            }
            if question.correct_answers.is_empty() {
                errors.push(format!("Question {n}: at least one correct answer is required"));
            } else if question
                .correct_answers
                .iter()
                .any(|&i| i >= question.options.len())
            {
                errors.push(format!("Question {n}: correct answer index out of range"));
            }
        }
        QuestionKind::TrueFalse => {
            let standard = question.options.is_empty()
                || question.options.iter().map(String::as_str).eq(["True", "False"]);
            if !standard {
                errors.push(format!(
                    "Question {n}: true/false options must be exactly True and False"
                ));
            }
            if !matches!(question.correct_answers.as_slice(), [0] | [1]) {
                errors.push(format!(
                    "Question {n}: true/false needs exactly one correct answer (0 or 1)"
                ));
            }
        }
        QuestionKind::ShortAnswer => {
            if question.answer.as_deref().is_none_or(|a| a.trim().is_empty()) {
                errors.push(format!("Question {n}: short answer needs a reference answer"));
            }
        }
        QuestionKind::Essay => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(questions: &[Question]) -> ValidationReport {
        StructuralQuizValidator.validate_questions(questions)
    }

    #[test]
    fn test_valid_question_set() {
        let questions = vec![
            Question::multiple_choice("q1", "2 + 2?", vec!["3".into(), "4".into()], vec![1]),
            Question::true_false("q2", "The earth is flat", false),
            Question::short_answer("q3", "Capital of France?", "Paris"),
            Question::essay("q4", "Discuss entropy"),
        ];
        let report = validate(&questions);
        assert!(report.is_valid, "{:?}", report.errors);
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_empty_set_is_invalid() {
        let report = validate(&[]);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_errors_are_collected_and_joined() {
        let mut bad_tf = Question::true_false("q1", "Maybe?", true);
        bad_tf.correct_answers = vec![0, 1];
        let mut no_answer = Question::short_answer("q1", " ", "x");
        no_answer.answer = None;
        let mc = Question::multiple_choice("q3", "Pick", vec!["only".into()], vec![3]);

        let report = validate(&[bad_tf, no_answer, mc]);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 6);

        let err = report.into_result().unwrap_err();
        assert!(err.is(quizhub_core::error::ErrorKind::Validation));
        assert!(err.message.contains("; "));
        assert!(err.message.contains("duplicate id 'q1'"));
    }

    #[test]
    fn test_true_false_without_options_is_allowed() {
        let mut tf = Question::true_false("q1", "Yes?", true);
        tf.options.clear();
        assert!(validate(&[tf]).is_valid);
    }

    #[test]
    fn test_zero_points_rejected() {
        let mut q = Question::essay("q1", "Write");
        q.points = 0;
        assert!(!validate(&[q]).is_valid);
    }
}
