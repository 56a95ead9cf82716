// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations.
//!
//! Each command turns its arguments into a validated request, calls the
//! gateway once, and prints the result.

use std::path::Path;

use canvas_core::{CanvasError, ChatMessage};
use canvas_gateway::{
    AssignmentDraftRequest, CompletionGateway, ContentRequest, DoubtResolutionRequest,
};

use crate::cli::{ContentArgs, DraftArgs, HintArgs, StatusArgs};
use crate::output::{Outcome, Printer};

/// `canvas draft`
pub async fn run_draft(
    gateway: &CompletionGateway,
    args: &DraftArgs,
    printer: &Printer,
) -> Result<Outcome, CanvasError> {
    let mut builder = AssignmentDraftRequest::builder()
        .topic(&args.topic)
        .grade_level(&args.grade_level)
        .question_type(args.question_type)
        .difficulty(args.difficulty)
        .description(&args.description);
    if let Some(count) = args.count {
        builder = builder.question_count(count);
    }
    if let Some(words) = args.words {
        builder = builder.word_count(words);
    }
    let request = builder.build()?;

    Ok(printer.result(&gateway.generate_assignment_draft(&request).await))
}

/// `canvas hint`
pub async fn run_hint(
    gateway: &CompletionGateway,
    args: &HintArgs,
    printer: &Printer,
) -> Result<Outcome, CanvasError> {
    let mut request = DoubtResolutionRequest::new(&args.question, &args.context)?;
    if let Some(path) = &args.history {
        request = request.with_history(load_history(path)?)?;
    }

    Ok(printer.result(&gateway.resolve_doubt(&request).await))
}

/// `canvas content`
pub async fn run_content(
    gateway: &CompletionGateway,
    args: &ContentArgs,
    printer: &Printer,
) -> Result<Outcome, CanvasError> {
    let request = ContentRequest::new(&args.subject, &args.title, args.difficulty, &args.prompt)?;

    Ok(printer.result(&gateway.generate_content(&request).await))
}

/// `canvas status`
pub async fn run_status(
    gateway: &CompletionGateway,
    args: &StatusArgs,
    printer: &Printer,
) -> Result<Outcome, CanvasError> {
    let mut status = gateway.api_status().await;
    if args.strict && status.connected && !gateway.check_connection().await {
        status.connected = false;
        status.error = Some("The AI service did not echo the probe phrase.".to_string());
    }

    Ok(printer.status(&status))
}

/// Reads prior conversation turns from a JSON array of `{role, content}`.
pub fn load_history(path: &Path) -> Result<Vec<ChatMessage>, CanvasError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        CanvasError::InvalidRequest(format!("cannot read history file {}: {e}", path.display()))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        CanvasError::InvalidRequest(format!("invalid history file {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use canvas_config::CanvasConfig;
    use canvas_core::{FailureReason, Role};
    use canvas_gateway::{Difficulty, QuestionType};
    use canvas_test_utils::ScriptedTransport;

    use super::*;

    fn gateway_over(transport: &Arc<ScriptedTransport>) -> CompletionGateway {
        CompletionGateway::new(transport.clone(), &CanvasConfig::default())
    }

    fn printer() -> Printer {
        Printer::new(false, true)
    }

    fn draft_args() -> DraftArgs {
        DraftArgs {
            topic: "Fractions".into(),
            grade_level: "5th Grade".into(),
            question_type: QuestionType::Mcq,
            difficulty: Difficulty::Easy,
            count: Some(5),
            words: None,
            description: "fractions".into(),
        }
    }

    #[tokio::test]
    async fn draft_success_and_failure_outcomes() {
        let transport = Arc::new(ScriptedTransport::replying("1. Q"));
        let gateway = gateway_over(&transport);
        let outcome = run_draft(&gateway, &draft_args(), &printer()).await.unwrap();
        assert_eq!(outcome, Outcome::Success);

        transport.push_failure(FailureReason::AuthError).await;
        let outcome = run_draft(&gateway, &draft_args(), &printer()).await.unwrap();
        assert_eq!(outcome, Outcome::Failed);
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_transport() {
        let transport = Arc::new(ScriptedTransport::new());
        let gateway = gateway_over(&transport);
        let mut args = draft_args();
        args.words = Some(200);

        let err = run_draft(&gateway, &args, &printer()).await.unwrap_err();
        assert!(matches!(err, CanvasError::InvalidRequest(_)));
        assert_eq!(transport.attempts().await, 0);
    }

    #[tokio::test]
    async fn hint_reads_history_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"role":"user","content":"a"}},{{"role":"assistant","content":"b"}}]"#
        )
        .unwrap();

        let transport = Arc::new(ScriptedTransport::replying("Look at the denominators."));
        let gateway = gateway_over(&transport);
        let args = HintArgs {
            question: "c".into(),
            context: "ctx".into(),
            history: Some(file.path().to_path_buf()),
        };

        let outcome = run_hint(&gateway, &args, &printer()).await.unwrap();
        assert_eq!(outcome, Outcome::Success);
        let sent = transport.last_request().await.unwrap();
        let roles: Vec<Role> = sent.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, [Role::System, Role::User, Role::Assistant, Role::User]);
    }

    #[test]
    fn history_with_system_turn_is_rejected_later() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"role":"system","content":"x"}}]"#).unwrap();
        let history = load_history(file.path()).unwrap();
        assert_eq!(history[0].role, Role::System);
        assert!(DoubtResolutionRequest::new("q", "").unwrap().with_history(history).is_err());
    }

    #[test]
    fn malformed_history_is_invalid_request() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_history(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid history file"), "got: {err}");

        let err = load_history(Path::new("/nonexistent/history.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read history file"), "got: {err}");
    }

    #[tokio::test]
    async fn strict_status_requires_echo() {
        let transport = Arc::new(ScriptedTransport::replying("Hi!"));
        let gateway = gateway_over(&transport);

        let lenient = run_status(&gateway, &StatusArgs { strict: false }, &printer()).await.unwrap();
        assert_eq!(lenient, Outcome::Success);
        let strict = run_status(&gateway, &StatusArgs { strict: true }, &printer()).await.unwrap();
        assert_eq!(strict, Outcome::Failed);
    }

    #[tokio::test]
    async fn content_command() {
        let transport = Arc::new(ScriptedTransport::replying("Worksheet"));
        let gateway = gateway_over(&transport);
        let args = ContentArgs {
            subject: "Math".into(),
            title: "Quiz".into(),
            difficulty: Difficulty::Medium,
            prompt: "Area of circles".into(),
        };
        let outcome = run_content(&gateway, &args, &printer()).await.unwrap();
        assert_eq!(outcome, Outcome::Success);
    }
}
