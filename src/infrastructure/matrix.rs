//! # Matrix Service Adapter
//!
//! Implements the `ChatProvider` trait for the Matrix protocol using the `matrix_sdk`.
//! Matrix has no reply keyboards, so suggested answers are appended to the message
//! as an options line. Local files are uploaded as attachments; `mxc://` handles are
//! sent as image events without re-uploading.

use crate::domain::traits::ChatProvider;
use crate::domain::types::{Keyboard, MediaSource};
use crate::strings::messages;
use anyhow::Result;
use async_trait::async_trait;
use matrix_sdk::attachment::AttachmentConfig;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::OwnedMxcUri;
use matrix_sdk::ruma::events::room::message::{
    ImageMessageEventContent, MessageType, RoomMessageEventContent,
};
use std::path::Path;

#[derive(Clone)]
pub struct MatrixService {
    room: Room,
}

impl MatrixService {
    pub fn new(room: Room) -> Self {
        Self { room }
    }

    async fn internal_send_markdown(&self, content: &str) -> Result<()> {
        self.room
            .send(RoomMessageEventContent::text_markdown(content))
            .await?;
        Ok(())
    }

    /// Uploads a local file. PNG files become image events unless `as_file` forces
    /// a generic attachment.
    async fn internal_upload(&self, path: &Path, as_file: bool) -> Result<()> {
        let data = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sticker.png".to_string());
        let content_type = if as_file {
            mime_guess::mime::APPLICATION_OCTET_STREAM
        } else {
            mime_guess::from_path(path).first_or_octet_stream()
        };

        self.room
            .send_attachment(filename, &content_type, data, AttachmentConfig::new())
            .await?;
        Ok(())
    }

    async fn internal_send_remote_image(&self, handle: &str) -> Result<()> {
        let image = ImageMessageEventContent::plain("image".to_string(), OwnedMxcUri::from(handle));
        self.room
            .send(RoomMessageEventContent::new(MessageType::Image(image)))
            .await?;
        Ok(())
    }
}

/// Suggested answers rendered as plain text, if the keyboard has any.
pub fn keyboard_hint(keyboard: &Keyboard) -> Option<String> {
    let options: Vec<String> = match keyboard {
        Keyboard::None => return None,
        Keyboard::YesNo => vec![messages::YES.to_string(), messages::NO.to_string()],
        Keyboard::FontIndices { min, max } => (*min..=*max).map(|i| i.to_string()).collect(),
        Keyboard::ColorNames(names) => names.clone(),
    };
    if options.is_empty() {
        return None;
    }
    Some(format!("_{}: {}_", messages::OPTIONS_LABEL, options.join(" · ")))
}

fn with_hint(content: &str, keyboard: &Keyboard) -> String {
    match keyboard_hint(keyboard) {
        Some(hint) => format!("{content}\n\n{hint}"),
        None => content.to_string(),
    }
}

#[async_trait]
impl ChatProvider for MatrixService {
    fn room_id(&self) -> String {
        self.room.room_id().as_str().to_string()
    }

    async fn send_text(&self, content: &str, keyboard: &Keyboard) -> Result<(), String> {
        tracing::info!("Bot sending message to {}: {}", self.room_id(), content);
        self.internal_send_markdown(&with_hint(content, keyboard))
            .await
            .map_err(|e| e.to_string())
    }

    async fn send_photo(
        &self,
        source: &MediaSource,
        caption: Option<&str>,
        keyboard: &Keyboard,
    ) -> Result<(), String> {
        tracing::info!("Bot sending photo to {}: {:?}", self.room_id(), source);
        let sent = match source {
            MediaSource::Local(path) => self.internal_upload(path, false).await,
            MediaSource::Remote(handle) => self.internal_send_remote_image(handle).await,
        };
        sent.map_err(|e| e.to_string())?;

        // captions and hints follow the image as their own message
        let follow_up = match caption {
            Some(caption) => Some(with_hint(caption, keyboard)),
            None => keyboard_hint(keyboard),
        };
        if let Some(text) = follow_up {
            self.internal_send_markdown(&text)
                .await
                .map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    async fn send_document(&self, path: &Path, caption: Option<&str>) -> Result<(), String> {
        tracing::info!("Bot sending document to {}: {}", self.room_id(), path.display());
        self.internal_upload(path, true)
            .await
            .map_err(|e| e.to_string())?;
        if let Some(caption) = caption {
            self.internal_send_markdown(caption)
                .await
                .map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_hint() {
        assert_eq!(keyboard_hint(&Keyboard::None), None);
        assert_eq!(
            keyboard_hint(&Keyboard::YesNo).as_deref(),
            Some("_Варианты: Да · Нет_")
        );
        assert_eq!(
            keyboard_hint(&Keyboard::FontIndices { min: 1, max: 3 }).as_deref(),
            Some("_Варианты: 1 · 2 · 3_")
        );
        assert_eq!(keyboard_hint(&Keyboard::ColorNames(vec![])), None);
    }

    #[test]
    fn test_hint_is_appended() {
        let text = with_hint("Цвет?", &Keyboard::ColorNames(vec!["Белый".into()]));
        assert_eq!(text, "Цвет?\n\n_Варианты: Белый_");
        assert_eq!(with_hint("Текст", &Keyboard::None), "Текст");
    }
}
