//! Question records stored inline on a quiz.

use serde::{Deserialize, Serialize};

/// The answer format of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Pick one or more options.
    MultipleChoice,
    /// Pick true or false.
    TrueFalse,
    /// Free text compared against a reference answer.
    ShortAnswer,
    /// Long free text, graded manually.
    Essay,
}

/// One question of a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier unique within the quiz.
    pub id: String,
    /// Answer format.
    pub kind: QuestionKind,
    /// The question text.
    pub prompt: String,
    /// Answer options (choice questions only).
    #[serde(default)]
    pub options: Vec<String>,
    /// Indices into `options` that are correct.
    #[serde(default)]
    pub correct_answers: Vec<usize>,
    /// Reference answer for short-answer questions.
    #[serde(default)]
    pub answer: Option<String>,
    /// Points awarded.
    #[serde(default = "default_points")]
    pub points: u32,
    /// Shown after answering.
    #[serde(default)]
    pub explanation: Option<String>,
}

fn default_points() -> u32 {
    1
}

impl Question {
    /// A multiple-choice question.
    pub fn multiple_choice(
        id: impl Into<String>,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answers: Vec<usize>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: QuestionKind::MultipleChoice,
            prompt: prompt.into(),
            options,
            correct_answers,
            answer: None,
            points: default_points(),
            explanation: None,
        }
    }

    /// A true/false question; `truth` selects the correct option.
    pub fn true_false(id: impl Into<String>, prompt: impl Into<String>, truth: bool) -> Self {
        Self {
            id: id.into(),
            kind: QuestionKind::TrueFalse,
            prompt: prompt.into(),
            options: vec!["True".to_string(), "False".to_string()],
            correct_answers: vec![if truth { 0 } else { 1 }],
            answer: None,
            points: default_points(),
            explanation: None,
        }
    }

    /// A short-answer question.
    pub fn short_answer(
        id: impl Into<String>,
        prompt: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: QuestionKind::ShortAnswer,
            prompt: prompt.into(),
            options: Vec::new(),
            correct_answers: Vec::new(),
            answer: Some(answer.into()),
            points: default_points(),
            explanation: None,
        }
    }

    /// An essay question.
    pub fn essay(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: QuestionKind::Essay,
            prompt: prompt.into(),
            options: Vec::new(),
            correct_answers: Vec::new(),
            answer: None,
            points: default_points(),
            explanation: None,
        }
    }
}
