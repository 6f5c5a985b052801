//! # Sticker Commands
//!
//! Handles `/create_sticker`, the service commands and free text sent while a
//! wizard session is open. Every handler answers with directives; wizard errors
//! never escape as `Err`.

use crate::application::session::SessionStore;
use crate::application::wizard::{ServiceCommand, StepMachine};
use crate::domain::types::Directive;

/// Opens a session and emits the first step's prompt.
pub async fn handle_create(
    store: &SessionStore,
    machine: &StepMachine,
    identity: &str,
) -> Vec<Directive> {
    if let Err(e) = store.open(identity).await {
        return vec![Directive::text(e.to_string())];
    }
    run_step(store, machine, identity, None).await
}

pub async fn handle_service(
    store: &SessionStore,
    machine: &StepMachine,
    identity: &str,
    command: ServiceCommand,
) -> Vec<Directive> {
    run_step(store, machine, identity, Some(command.as_str())).await
}

pub async fn handle_message(
    store: &SessionStore,
    machine: &StepMachine,
    identity: &str,
    text: &str,
) -> Vec<Directive> {
    run_step(store, machine, identity, Some(text)).await
}

async fn run_step(
    store: &SessionStore,
    machine: &StepMachine,
    identity: &str,
    input: Option<&str>,
) -> Vec<Directive> {
    match store
        .update(identity, |session| machine.dispatch(session, input))
        .await
    {
        Ok(directives) => directives,
        Err(e) => vec![Directive::text(e.to_string())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::wizard::testing::{machine, texts};
    use crate::domain::error::WizardError;
    use crate::strings::messages;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_twice_reports_open_session() {
        let dir = TempDir::new().unwrap();
        let machine = machine(dir.path());
        let store = SessionStore::new("first.ttf");

        let out = handle_create(&store, &machine, "42").await;
        assert_eq!(texts(&out), vec![messages::SET_TEXT_PROMPT]);

        let out = handle_create(&store, &machine, "42").await;
        assert_eq!(
            texts(&out),
            vec![WizardError::SessionAlreadyOpen.to_string().as_str()]
        );
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_input_without_session() {
        let dir = TempDir::new().unwrap();
        let machine = machine(dir.path());
        let store = SessionStore::new("first.ttf");

        let not_found = WizardError::SessionNotFound.to_string();
        let out = handle_message(&store, &machine, "42", "hello").await;
        assert_eq!(texts(&out), vec![not_found.as_str()]);
        let out = handle_service(&store, &machine, "42", ServiceCommand::NextStep).await;
        assert_eq!(texts(&out), vec![not_found.as_str()]);
        assert!(!store.contains("42").await);
    }

    #[tokio::test]
    async fn test_message_advances_live_session() {
        let dir = TempDir::new().unwrap();
        let machine = machine(dir.path());
        let store = SessionStore::new("first.ttf");
        handle_create(&store, &machine, "42").await;

        let out = handle_message(&store, &machine, "42", "foo bar").await;
        assert_eq!(texts(&out), vec![messages::SET_BACKGROUND_COLOR_PROMPT]);
        let session = store.get("42").await.unwrap();
        assert_eq!(session.draft.text.as_deref(), Some("foo bar"));
        assert_eq!(session.step, 1);
    }
}
