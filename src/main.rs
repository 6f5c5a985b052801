//! # Main Entry Point
//!
//! Initializes the sticker bot:
//! - Domain: Configuration, catalogs and types
//! - Infrastructure: Matrix, fonts
//! - Application: Router, wizard, renderer, sessions, logging
//! - Interface: Command Handlers
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::Parser;
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::{MessageType, SyncRoomMessageEvent},
    },
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;

use crate::application::renderer::Renderer;
use crate::application::router::CommandRouter;
use crate::application::session::{SessionStore, spawn_sweeper};
use crate::application::wizard::{StepMachine, WizardSettings};
use crate::domain::config::AppConfig;
use crate::infrastructure::fonts::FontDirectory;
use crate::infrastructure::matrix::MatrixService;
use crate::strings::logs;

const LOG_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(version, about = "Matrix bot that draws text stickers")]
struct Args {
    /// Path to the YAML configuration
    #[arg(short, long, default_value = "data/config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load Configuration
    let config = AppConfig::load(&args.config).context(logs::CONFIG_READ_ERROR)?;

    // 2. Logging Setup
    let _log_guard = application::logging::init_tracing(Path::new(LOG_DIR))?;
    tracing::info!("{}", logs::config_loaded(&args.config.display().to_string()));

    // 3. Fonts and Renderer
    let font_catalog = config.font_catalog()?;
    let fonts = Arc::new(FontDirectory::new(&config.sticker.fonts_dir));
    fonts
        .preload(font_catalog.files())
        .context("Failed to load font catalog")?;
    let renderer = Renderer::new(
        fonts,
        config.sticker.margin,
        config.sticker.overshoot_factor,
    );

    // 4. Wizard and Sessions
    let machine = Arc::new(StepMachine::new(
        WizardSettings {
            colors: config.color_catalog(),
            fonts: font_catalog,
            font_example: config.fonts.example_source(),
            content_dir: config.sticker.content_dir.clone(),
            width: config.sticker.width,
            height: config.sticker.height,
        },
        renderer,
    ));
    let store = Arc::new(SessionStore::new(config.fonts.default.clone()));
    let router = Arc::new(CommandRouter::new(
        config.clone(),
        store.clone(),
        machine,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = spawn_sweeper(store, config.session.ttl(), shutdown_rx);

    // 5. Matrix Setup
    let matrix = &config.services.matrix;
    let client = Client::builder()
        .homeserver_url(&matrix.homeserver)
        .build()
        .await?;

    client
        .matrix_auth()
        .login_username(&matrix.username, &matrix.password)
        .send()
        .await
        .context("Matrix login failed")?;
    tracing::info!("{}", logs::logged_in(&matrix.username));

    if let Some(name) = &matrix.display_name {
        tracing::info!("{}", logs::setting_display_name(name));
        if let Err(e) = client.account().set_display_name(Some(name.as_str())).await {
            tracing::warn!("{}", logs::set_display_name_fail(&e.to_string()));
        }
    }

    // 6. Event Handlers
    let start_time = std::time::SystemTime::now();
    let loop_router = router.clone();

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let router = loop_router.clone();

        async move {
            let Some(original_msg) = ev.as_original() else {
                return;
            };

            // Ignore events older than start_time
            let ts = ev.origin_server_ts();
            let event_time =
                std::time::UNIX_EPOCH + std::time::Duration::from_millis(ts.get().into());
            if event_time < start_time {
                return;
            }

            let MessageType::Text(text_content) = &original_msg.content.msgtype else {
                return;
            };
            if original_msg.sender == room.own_user_id() {
                return;
            }
            tracing::info!(
                "Received message from {}: \n{}",
                original_msg.sender,
                text_content.body
            );

            let chat = MatrixService::new(room);
            if let Err(e) = router
                .route(&chat, &text_content.body, original_msg.sender.as_str())
                .await
            {
                tracing::error!("Failed to route message: {}", e);
            }
        }
    });

    // Handle Invites
    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            tracing::info!("{}", logs::invite_received(room.room_id().as_str()));
            if let Err(e) = room.join().await {
                tracing::error!("{}", logs::join_invite_fail(&e.to_string()));
            }
        }
    });

    // 7. Sync until interrupted
    tracing::info!("{}", logs::SYNC_LOOP_START);
    tokio::select! {
        res = client.sync(SyncSettings::default()) => {
            if let Err(e) = res {
                tracing::error!("{}", logs::sync_loop_fail(&e.to_string()));
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("{}", logs::SHUTDOWN);
        }
    }

    let _ = shutdown_tx.send(true);
    if let Err(e) = sweeper.await {
        tracing::error!("Session sweeper panicked: {}", e);
    }

    Ok(())
}
