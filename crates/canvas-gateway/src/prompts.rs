// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt builders for each gateway operation.
//!
//! Every builder is a pure function of its request, so identical input always
//! yields an identical message sequence. The system message is always first.

use canvas_core::ChatMessage;

use crate::request::{AssignmentDraftRequest, ContentRequest, DoubtResolutionRequest, QuestionType};

/// Phrase the connectivity probe asks the provider to echo.
pub const PROBE_PHRASE: &str = "Connection successful";

const DRAFT_SYSTEM: &str = "You are an expert K-12 educational content creator for The Learning Canvas. \
Generate accurate, age-appropriate assignment content that directly addresses the requested topic, \
grade level, difficulty and question type.\n\n\
Do not include conversational introductions or closings such as \"Here is your assignment:\". \
Return only the assignment content, formatted as a numbered list of questions, a problem set, \
or an essay prompt, so it can be handed to students and graded as-is. \
Use a neutral, formal tone.";

const MCQ_RULES: &str = "For each multiple-choice question, list four options labelled A, B, C and D, \
then state the correct answer.";

const TRUE_FALSE_RULES: &str = "For each true/false statement, state the correct answer.";

const TUTOR_SYSTEM: &str = "You are a patient, encouraging K-12 tutor for The Learning Canvas. \
Guide the student towards understanding by giving only the next logical step, \
one concise hint, or a clarifying question.\n\n\
Never give the full solution or the final answer. When the student asks for the next step or \
another hint, move exactly one step beyond your previous reply.\n\n\
If the question is unclear or outside your scope, ask for clarification or suggest they ask \
their teacher. Keep the focus on the hint and do not talk about being an AI.";

const CONTENT_SYSTEM: &str = "You are an expert K-12 educational content creator for The Learning Canvas. \
Write complete assignment content from the teacher's brief: questions, instructions and any \
supporting material students need. Return only the content, without conversational filler.";

/// Messages for an assignment draft: system instruction plus one structured user block.
pub fn assignment_messages(request: &AssignmentDraftRequest) -> Vec<ChatMessage> {
    let mut system = String::from(DRAFT_SYSTEM);
    match request.question_type() {
        QuestionType::Mcq => {
            system.push_str("\n\n");
            system.push_str(MCQ_RULES);
        }
        QuestionType::TrueFalse => {
            system.push_str("\n\n");
            system.push_str(TRUE_FALSE_RULES);
        }
        QuestionType::ShortAnswer | QuestionType::Essay | QuestionType::ProblemSet => {}
    }

    let mut user = format!(
        "Generate an assignment with the following criteria:\n\
         - Topic: {}\n\
         - Grade Level: {}\n\
         - Question Type: {}\n\
         - Difficulty: {}\n",
        request.topic(),
        request.grade_level(),
        request.question_type(),
        request.difficulty(),
    );
    if let Some(count) = request.question_count() {
        user.push_str(&format!("- Number of Questions: {count}\n"));
    }
    if let Some(words) = request.word_count() {
        user.push_str(&format!("- Approximate Word Count: {words}\n"));
    }
    user.push_str(&format!("- Focus: {}\n", request.description()));
    user.push_str("\nReturn only the assignment content, clearly formatted, with no conversational filler.");

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Messages for a doubt: `[system, history..., user(question + context)]`.
pub fn doubt_messages(request: &DoubtResolutionRequest) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(request.history().len() + 2);
    messages.push(ChatMessage::system(TUTOR_SYSTEM));
    messages.extend(request.history().iter().cloned());
    messages.push(ChatMessage::user(format!(
        "My question is: \"{}\". The context for this problem is: \"{}\". \
         Please provide the next logical step or a hint.",
        request.student_question(),
        request.assignment_context(),
    )));
    messages
}

/// Messages for free-form calendar content.
pub fn content_messages(request: &ContentRequest) -> Vec<ChatMessage> {
    let mut user = String::from("Create assignment content for:\n\n");
    if !request.subject().is_empty() {
        user.push_str(&format!("Subject: {}\n", request.subject()));
    }
    if !request.title().is_empty() {
        user.push_str(&format!("Title: {}\n", request.title()));
    }
    user.push_str(&format!("Difficulty: {}\n", request.difficulty()));
    user.push_str(&format!("Prompt: {}\n", request.prompt()));
    user.push_str(
        "\nProvide detailed assignment content including questions, instructions, and any relevant materials.",
    );

    vec![ChatMessage::system(CONTENT_SYSTEM), ChatMessage::user(user)]
}

/// Fixed system+user pair for the connectivity probe.
pub fn probe_messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(format!(
            "You are a helpful assistant. Respond with exactly \"{PROBE_PHRASE}\" to test the API."
        )),
        ChatMessage::user(format!(
            "Hello, this is a test. Please respond with \"{PROBE_PHRASE}\"."
        )),
    ]
}

#[cfg(test)]
mod tests {
    use canvas_core::Role;

    use super::*;
    use crate::request::Difficulty;

    fn fractions_mcq() -> AssignmentDraftRequest {
        AssignmentDraftRequest::builder()
            .description("fractions")
            .question_type(QuestionType::Mcq)
            .difficulty(Difficulty::Easy)
            .topic("Fractions")
            .grade_level("5th Grade")
            .question_count(5)
            .build()
            .unwrap()
    }

    #[test]
    fn assignment_user_block_carries_every_field() {
        let messages = assignment_messages(&fractions_mcq());
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);

        let user = &messages[1].content;
        for needle in ["Fractions", "5th Grade", "MCQ", "Easy", "Number of Questions: 5"] {
            assert!(user.contains(needle), "missing {needle:?} in {user}");
        }
        assert!(!user.contains("Word Count"));
    }

    #[test]
    fn assignment_fields_sit_on_their_own_lines() {
        let user = &assignment_messages(&fractions_mcq())[1].content;
        let lines: Vec<&str> = user.lines().filter(|l| l.starts_with("- ")).collect();
        assert_eq!(
            lines,
            [
                "- Topic: Fractions",
                "- Grade Level: 5th Grade",
                "- Question Type: MCQ",
                "- Difficulty: Easy",
                "- Number of Questions: 5",
                "- Focus: fractions",
            ]
        );
    }

    #[test]
    fn mcq_system_message_requires_labelled_options() {
        let messages = assignment_messages(&fractions_mcq());
        assert!(messages[0].content.contains("A, B, C and D"));
        assert!(messages[0].content.contains("correct answer"));
    }

    #[test]
    fn essay_includes_word_count_without_option_rules() {
        let essay = AssignmentDraftRequest::builder()
            .description("the water cycle")
            .question_type(QuestionType::Essay)
            .difficulty(Difficulty::Medium)
            .topic("Science")
            .grade_level("7th Grade")
            .word_count(400)
            .build()
            .unwrap();
        let messages = assignment_messages(&essay);
        assert!(messages[1].content.contains("Approximate Word Count: 400"));
        assert!(!messages[0].content.contains("A, B, C and D"));
    }

    #[test]
    fn doubt_preserves_history_order() {
        let request = DoubtResolutionRequest::new("c", "worksheet 3")
            .unwrap()
            .with_history(vec![ChatMessage::user("a"), ChatMessage::assistant("b")])
            .unwrap();
        let messages = doubt_messages(&request);

        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, [Role::System, Role::User, Role::Assistant, Role::User]);
        assert_eq!(messages[1].content, "a");
        assert_eq!(messages[2].content, "b");
        assert!(messages[3].content.contains("\"c\""));
        assert!(messages[3].content.contains("\"worksheet 3\""));
    }

    #[test]
    fn content_skips_blank_optional_fields() {
        let request = ContentRequest::new("", "Week 4 quiz", Difficulty::Hard, "Photosynthesis").unwrap();
        let user = &content_messages(&request)[1].content;
        assert!(!user.contains("Subject:"));
        assert!(user.contains("Title: Week 4 quiz"));
        assert!(user.contains("Difficulty: Hard"));
        assert!(user.contains("Prompt: Photosynthesis"));
    }

    #[test]
    fn probe_asks_for_echo_phrase() {
        let messages = probe_messages();
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|m| m.content.contains(PROBE_PHRASE)));
    }
}
