//! # Command Router
//!
//! Routes incoming messages to the appropriate command handler (in `interface/commands`).
//! It parses the command token (e.g. `/create_sticker` or `.next_step`), applies the
//! access gate and delivers the resulting directives through the chat provider.

use anyhow::Result;
use std::sync::Arc;

use crate::application::session::SessionStore;
use crate::application::wizard::{ServiceCommand, StepMachine};
use crate::domain::config::AppConfig;
use crate::domain::traits::ChatProvider;
use crate::domain::types::{Directive, Keyboard};
use crate::interface::commands;
use crate::strings::{logs, messages};

const COMMAND_PREFIXES: [char; 2] = ['/', '.'];

/// A prefixed command token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    CreateSticker,
    Reset,
    Service(ServiceCommand),
    Unknown(String),
}

impl UserCommand {
    /// `None` when the message is free text.
    pub fn parse(message: &str) -> Option<Self> {
        let rest = message.trim().strip_prefix(COMMAND_PREFIXES)?;
        let token = rest.split_whitespace().next().unwrap_or_default();
        let command = match token {
            "create_sticker" => Self::CreateSticker,
            "start" | "reset" => Self::Reset,
            other => ServiceCommand::parse(other)
                .map(Self::Service)
                .unwrap_or_else(|| Self::Unknown(other.to_string())),
        };
        Some(command)
    }
}

pub struct CommandRouter {
    config: AppConfig,
    store: Arc<SessionStore>,
    machine: Arc<StepMachine>,
}

impl CommandRouter {
    pub fn new(config: AppConfig, store: Arc<SessionStore>, machine: Arc<StepMachine>) -> Self {
        Self {
            config,
            store,
            machine,
        }
    }

    /// Directives answering `message` from `identity`, without delivering them.
    pub async fn handle(&self, identity: &str, message: &str) -> Vec<Directive> {
        let (store, machine) = (self.store.as_ref(), self.machine.as_ref());
        match UserCommand::parse(message) {
            Some(UserCommand::CreateSticker) => {
                commands::sticker::handle_create(store, machine, identity).await
            }
            Some(UserCommand::Reset) => commands::help::handle_reset(store, identity).await,
            Some(UserCommand::Service(command)) => {
                commands::sticker::handle_service(store, machine, identity, command).await
            }
            Some(UserCommand::Unknown(_)) => vec![Directive::text(messages::UNKNOWN_COMMAND)],
            None => commands::sticker::handle_message(store, machine, identity, message).await,
        }
    }

    pub async fn route<C>(&self, chat: &C, message: &str, sender: &str) -> Result<()>
    where
        C: ChatProvider + ?Sized,
    {
        let msg = message.trim();
        tracing::info!("Router dispatching '{}' sender='{}'", msg, sender);

        if !self.config.is_allowed(sender) {
            tracing::warn!("{}", logs::access_denied(sender));
            return chat
                .send_text(messages::ACCESS_DENIED, &Keyboard::None)
                .await
                .map_err(|e| anyhow::anyhow!(e));
        }

        let directives = self.handle(sender, msg).await;
        self.deliver(chat, sender, directives).await;
        Ok(())
    }

    /// Sends directives in order. A failed send is logged and the rest still go out.
    pub async fn deliver<C>(&self, chat: &C, identity: &str, directives: Vec<Directive>)
    where
        C: ChatProvider + ?Sized,
    {
        for directive in directives {
            let (kind, result) = match &directive {
                Directive::Text { text, keyboard } => ("text", chat.send_text(text, keyboard).await),
                Directive::Photo {
                    source,
                    caption,
                    keyboard,
                } => (
                    "photo",
                    chat.send_photo(source, caption.as_deref(), keyboard).await,
                ),
                Directive::Document { path, caption } => (
                    "document",
                    chat.send_document(path, caption.as_deref()).await,
                ),
                Directive::CloseSession => {
                    self.store.close(identity).await;
                    continue;
                }
            };
            if let Err(e) = result {
                tracing::error!("{}", logs::delivery_failed(kind, &chat.room_id(), &e));
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{RecordingChat, Sent};
    use super::*;
    use crate::application::wizard::testing::machine;
    use crate::domain::error::WizardError;
    use crate::domain::types::MediaSource;
    use chrono::Local;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
services:
  matrix:
    username: bot
    password: pw
    homeserver: https://matrix.example.org
fonts:
  default: first.ttf
  catalog: [first.ttf, second.ttf, third.ttf]
"#;

    fn router(content_dir: &Path, config: &str) -> CommandRouter {
        CommandRouter::new(
            AppConfig::parse(config).unwrap(),
            Arc::new(SessionStore::new("first.ttf")),
            Arc::new(machine(content_dir)),
        )
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            UserCommand::parse("/create_sticker"),
            Some(UserCommand::CreateSticker)
        );
        assert_eq!(
            UserCommand::parse(" .create_sticker "),
            Some(UserCommand::CreateSticker)
        );
        assert_eq!(UserCommand::parse("/start"), Some(UserCommand::Reset));
        assert_eq!(UserCommand::parse(".reset"), Some(UserCommand::Reset));
        assert_eq!(
            UserCommand::parse("/next_step"),
            Some(UserCommand::Service(ServiceCommand::NextStep))
        );
        assert_eq!(
            UserCommand::parse(".step_back"),
            Some(UserCommand::Service(ServiceCommand::StepBack))
        );
        assert_eq!(
            UserCommand::parse("/dance now"),
            Some(UserCommand::Unknown("dance".into()))
        );
        assert_eq!(UserCommand::parse("foo bar"), None);
        assert_eq!(UserCommand::parse("next_step"), None);
    }

    #[tokio::test]
    async fn test_full_wizard_run_sends_document_and_closes() {
        let dir = TempDir::new().unwrap();
        let router = router(dir.path(), CONFIG);
        let chat = RecordingChat::default();

        for message in [
            "/create_sticker",
            "foo bar",
            "/next_step",
            "/next_step",
            "/next_step",
        ] {
            router.route(&chat, message, "42").await.unwrap();
        }
        assert_eq!(
            chat.texts().last().map(String::as_str),
            Some(messages::set_split_pattern_prompt("1, 1", 2).as_str())
        );

        router.route(&chat, "2", "42").await.unwrap();
        let session = router.store.get("42").await.unwrap();
        let artifact = session.artifact.clone().unwrap();
        assert!(artifact.exists());
        assert_eq!(session.draft.split_pattern, Some(vec![2]));
        assert!(
            chat.sent()
                .contains(&Sent::Photo(MediaSource::Local(artifact.clone()), None))
        );

        router.route(&chat, "Да", "42").await.unwrap();
        let sent = chat.sent();
        let tail = &sent[sent.len() - 2..];
        assert_eq!(
            tail,
            &[
                Sent::Document(artifact.clone()),
                Sent::Text(messages::END_MESSAGE.to_string(), Keyboard::None),
            ]
        );
        assert!(!router.store.contains("42").await);
        assert!(!artifact.exists());
    }

    #[tokio::test]
    async fn test_emoji_text_is_rejected_without_progress() {
        let dir = TempDir::new().unwrap();
        let router = router(dir.path(), CONFIG);
        let chat = RecordingChat::default();

        router.route(&chat, "/create_sticker", "42").await.unwrap();
        let before = router.store.get("42").await.unwrap();
        router.route(&chat, "hello 😀", "42").await.unwrap();

        assert_eq!(
            chat.texts().last().cloned(),
            Some(WizardError::EmojiNotAllowed.to_string())
        );
        assert_eq!(router.store.get("42").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_expired_session_is_swept() {
        let dir = TempDir::new().unwrap();
        let router = router(dir.path(), CONFIG);
        let created = Local::now() - chrono::Duration::seconds(601);
        router.store.open_at("42", created).await.unwrap();

        let closed = router
            .store
            .sweep_expired(Local::now(), Duration::from_secs(600))
            .await;
        assert_eq!(closed, 1);

        let chat = RecordingChat::default();
        router.route(&chat, "foo", "42").await.unwrap();
        assert_eq!(chat.texts(), vec![WizardError::SessionNotFound.to_string()]);
    }

    #[tokio::test]
    async fn test_reset_replies_with_help() {
        let dir = TempDir::new().unwrap();
        let router = router(dir.path(), CONFIG);
        let chat = RecordingChat::default();

        router.route(&chat, "/create_sticker", "42").await.unwrap();
        router.route(&chat, "/reset", "42").await.unwrap();
        assert!(!router.store.contains("42").await);
        assert_eq!(
            chat.texts().last().map(String::as_str),
            Some(crate::strings::help::MAIN)
        );

        router.route(&chat, "/dance", "42").await.unwrap();
        assert_eq!(
            chat.texts().last().map(String::as_str),
            Some(messages::UNKNOWN_COMMAND)
        );
    }

    #[tokio::test]
    async fn test_access_gate() {
        let dir = TempDir::new().unwrap();
        let config = format!("{CONFIG}access:\n  allowed_users: [\"@alice:example.org\"]\n");
        let router = router(dir.path(), &config);
        let chat = RecordingChat::default();

        router
            .route(&chat, "/create_sticker", "@mallory:example.org")
            .await
            .unwrap();
        assert_eq!(chat.texts(), vec![messages::ACCESS_DENIED.to_string()]);
        assert_eq!(router.store.len().await, 0);

        router
            .route(&chat, "/create_sticker", "@Alice:example.org")
            .await
            .unwrap();
        assert!(router.store.contains("@Alice:example.org").await);
    }

    #[tokio::test]
    async fn test_failed_send_does_not_stop_delivery() {
        let dir = TempDir::new().unwrap();
        let router = router(dir.path(), CONFIG);
        let chat = RecordingChat {
            fail_photos: true,
            ..Default::default()
        };
        router.store.open("42").await.unwrap();

        router
            .deliver(
                &chat,
                "42",
                vec![
                    Directive::Photo {
                        source: MediaSource::Remote("mxc://example.org/x".into()),
                        caption: None,
                        keyboard: Keyboard::None,
                    },
                    Directive::CloseSession,
                    Directive::text("after"),
                ],
            )
            .await;

        assert_eq!(chat.texts(), vec!["after".to_string()]);
        assert!(!router.store.contains("42").await);
    }
}
