// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validated request types for the gateway operations.
//!
//! Every request is checked when it is built, so the gateway never has to
//! reject input at call time.

use std::num::NonZeroU32;

use canvas_core::{CanvasError, ChatMessage, Role};
use strum::{Display, EnumString};

/// Kind of questions an assignment draft should contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum QuestionType {
    #[strum(to_string = "MCQ", serialize = "multiple-choice")]
    Mcq,
    #[strum(to_string = "Short Answer", serialize = "short-answer", serialize = "ShortAnswer")]
    ShortAnswer,
    Essay,
    #[strum(to_string = "Problem Set", serialize = "problem-set", serialize = "ProblemSet")]
    ProblemSet,
    #[strum(to_string = "True/False", serialize = "true-false", serialize = "TrueFalse")]
    TrueFalse,
}

impl QuestionType {
    /// Whether an approximate word count is meaningful for this type.
    pub fn accepts_word_count(self) -> bool {
        matches!(self, Self::Essay | Self::ShortAnswer)
    }
}

/// Target difficulty of generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A request to draft assignment content. Build with [`AssignmentDraftRequest::builder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentDraftRequest {
    description: String,
    question_type: QuestionType,
    difficulty: Difficulty,
    topic: String,
    grade_level: String,
    question_count: Option<NonZeroU32>,
    word_count: Option<NonZeroU32>,
}

impl AssignmentDraftRequest {
    pub fn builder() -> AssignmentDraftBuilder {
        AssignmentDraftBuilder::default()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn grade_level(&self) -> &str {
        &self.grade_level
    }

    pub fn question_count(&self) -> Option<NonZeroU32> {
        self.question_count
    }

    pub fn word_count(&self) -> Option<NonZeroU32> {
        self.word_count
    }
}

/// Builder for [`AssignmentDraftRequest`].
#[derive(Debug, Clone, Default)]
pub struct AssignmentDraftBuilder {
    description: Option<String>,
    question_type: Option<QuestionType>,
    difficulty: Option<Difficulty>,
    topic: Option<String>,
    grade_level: Option<String>,
    question_count: Option<u32>,
    word_count: Option<u32>,
}

impl AssignmentDraftBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn question_type(mut self, question_type: QuestionType) -> Self {
        self.question_type = Some(question_type);
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn grade_level(mut self, grade_level: impl Into<String>) -> Self {
        self.grade_level = Some(grade_level.into());
        self
    }

    pub fn question_count(mut self, count: u32) -> Self {
        self.question_count = Some(count);
        self
    }

    pub fn word_count(mut self, count: u32) -> Self {
        self.word_count = Some(count);
        self
    }

    /// Validates the collected fields.
    ///
    /// Text fields are trimmed and must be non-empty; counts must be at least
    /// 1; a word count is only accepted for essay and short-answer drafts.
    pub fn build(self) -> Result<AssignmentDraftRequest, CanvasError> {
        let topic = required_text("topic", self.topic)?;
        let grade_level = required_text("grade level", self.grade_level)?;
        let description = required_text("description", self.description)?;
        let question_type = self
            .question_type
            .ok_or_else(|| invalid("question type is required"))?;
        let difficulty = self
            .difficulty
            .ok_or_else(|| invalid("difficulty is required"))?;

        let question_count = positive("question count", self.question_count)?;
        let word_count = positive("word count", self.word_count)?;
        if word_count.is_some() && !question_type.accepts_word_count() {
            return Err(invalid(format!(
                "word count does not apply to {question_type} assignments"
            )));
        }

        Ok(AssignmentDraftRequest {
            description,
            question_type,
            difficulty,
            topic,
            grade_level,
            question_count,
            word_count,
        })
    }
}

/// A student's doubt, with the conversation so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubtResolutionRequest {
    student_question: String,
    assignment_context: String,
    history: Vec<ChatMessage>,
}

impl DoubtResolutionRequest {
    /// Creates a request with no prior turns. The context may be empty.
    pub fn new(
        student_question: impl Into<String>,
        assignment_context: impl Into<String>,
    ) -> Result<Self, CanvasError> {
        let student_question = required_text("student question", Some(student_question.into()))?;
        Ok(Self {
            student_question,
            assignment_context: assignment_context.into().trim().to_string(),
            history: Vec::new(),
        })
    }

    /// Attaches prior turns. Only user and assistant turns are accepted.
    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Result<Self, CanvasError> {
        if let Some(index) = history.iter().position(|m| m.role == Role::System) {
            return Err(invalid(format!(
                "history entry {index} has role system; only user and assistant turns are allowed"
            )));
        }
        self.history = history;
        Ok(self)
    }

    pub fn student_question(&self) -> &str {
        &self.student_question
    }

    pub fn assignment_context(&self) -> &str {
        &self.assignment_context
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }
}

/// Free-form content request from the assignment calendar's quick-draft panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    subject: String,
    title: String,
    difficulty: Difficulty,
    prompt: String,
}

impl ContentRequest {
    /// Creates a request; only the teacher's prompt is mandatory.
    pub fn new(
        subject: impl Into<String>,
        title: impl Into<String>,
        difficulty: Difficulty,
        prompt: impl Into<String>,
    ) -> Result<Self, CanvasError> {
        Ok(Self {
            subject: subject.into().trim().to_string(),
            title: title.into().trim().to_string(),
            difficulty,
            prompt: required_text("prompt", Some(prompt.into()))?,
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

fn invalid(message: impl Into<String>) -> CanvasError {
    CanvasError::InvalidRequest(message.into())
}

fn required_text(field: &str, value: Option<String>) -> Result<String, CanvasError> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        Some(_) => Err(invalid(format!("{field} must not be empty"))),
        None => Err(invalid(format!("{field} is required"))),
    }
}

fn positive(field: &str, value: Option<u32>) -> Result<Option<NonZeroU32>, CanvasError> {
    value
        .map(|v| NonZeroU32::new(v).ok_or_else(|| invalid(format!("{field} must be at least 1"))))
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn fractions() -> AssignmentDraftBuilder {
        AssignmentDraftRequest::builder()
            .description("fractions")
            .question_type(QuestionType::Mcq)
            .difficulty(Difficulty::Easy)
            .topic("Fractions")
            .grade_level("5th Grade")
    }

    #[test]
    fn builds_complete_request() {
        let request = fractions().question_count(5).build().unwrap();
        assert_eq!(request.topic(), "Fractions");
        assert_eq!(request.question_count().map(NonZeroU32::get), Some(5));
        assert_eq!(request.word_count(), None);
    }

    #[test]
    fn trims_text_fields() {
        let request = fractions().topic("  Fractions \n").build().unwrap();
        assert_eq!(request.topic(), "Fractions");
    }

    #[test]
    fn rejects_missing_and_blank_fields() {
        let err = AssignmentDraftRequest::builder().build().unwrap_err();
        assert!(err.to_string().contains("topic is required"), "got: {err}");

        let err = fractions().grade_level("   ").build().unwrap_err();
        assert!(err.to_string().contains("grade level must not be empty"), "got: {err}");

        let err = AssignmentDraftRequest::builder()
            .topic("t")
            .grade_level("g")
            .description("d")
            .difficulty(Difficulty::Hard)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("question type"), "got: {err}");
    }

    #[test]
    fn rejects_zero_counts() {
        let err = fractions().question_count(0).build().unwrap_err();
        assert!(matches!(err, CanvasError::InvalidRequest(m) if m.contains("question count")));
    }

    #[test]
    fn word_count_only_for_written_answers() {
        let err = fractions().word_count(300).build().unwrap_err();
        assert!(err.to_string().contains("does not apply to MCQ"), "got: {err}");

        let essay = fractions()
            .question_type(QuestionType::Essay)
            .word_count(300)
            .build()
            .unwrap();
        assert_eq!(essay.word_count().map(NonZeroU32::get), Some(300));
    }

    #[test]
    fn question_type_parses_common_spellings() {
        assert_eq!(QuestionType::from_str("mcq").unwrap(), QuestionType::Mcq);
        assert_eq!(QuestionType::from_str("MCQ").unwrap(), QuestionType::Mcq);
        assert_eq!(
            QuestionType::from_str("short-answer").unwrap(),
            QuestionType::ShortAnswer
        );
        assert_eq!(
            QuestionType::from_str("ProblemSet").unwrap(),
            QuestionType::ProblemSet
        );
        assert_eq!(QuestionType::from_str("true/false").unwrap(), QuestionType::TrueFalse);
        assert_eq!(QuestionType::TrueFalse.to_string(), "True/False");
        assert!(QuestionType::from_str("crossword").is_err());
        assert_eq!(Difficulty::from_str("hard").unwrap(), Difficulty::Hard);
    }

    #[test]
    fn doubt_request_rejects_system_history() {
        let request = DoubtResolutionRequest::new("Why is 1/2 > 1/3?", "Fractions worksheet").unwrap();
        let err = request
            .with_history(vec![ChatMessage::user("a"), ChatMessage::system("sneaky")])
            .unwrap_err();
        assert!(err.to_string().contains("history entry 1"), "got: {err}");
    }

    #[test]
    fn doubt_request_requires_question() {
        assert!(DoubtResolutionRequest::new("  ", "ctx").is_err());
        let ok = DoubtResolutionRequest::new("q", "").unwrap();
        assert_eq!(ok.assignment_context(), "");
        assert!(ok.history().is_empty());
    }

    #[test]
    fn content_request_requires_prompt() {
        assert!(ContentRequest::new("Math", "Quiz", Difficulty::Medium, "").is_err());
        let ok = ContentRequest::new("", "", Difficulty::Medium, "Area of circles").unwrap();
        assert_eq!(ok.prompt(), "Area of circles");
        assert_eq!(ok.subject(), "");
    }
}
