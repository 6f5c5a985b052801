//! # Session Store
//!
//! Owns the per-user wizard sessions (`identity -> Session`) behind a single mutex.
//! At most one session is open per identity; closing a session deletes the sticker
//! file it produced. A background sweeper closes sessions older than the TTL.

use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use crate::application::wizard::{FIRST_STEP, Step};
use crate::domain::error::{WizardError, WizardResult};
use crate::domain::types::StickerDraft;
use crate::strings::logs;

/// In-progress sticker creation for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub created: DateTime<Local>,
    pub step: usize,
    pub draft: StickerDraft,
    /// Rendered sticker on disk, removed when the session closes.
    pub artifact: Option<PathBuf>,
}

impl Session {
    pub fn new(created: DateTime<Local>, draft: StickerDraft) -> Self {
        Self {
            created,
            step: FIRST_STEP,
            draft,
            artifact: None,
        }
    }

    pub fn current_step(&self) -> Step {
        Step::at(self.step)
    }

    fn is_expired(&self, now: DateTime<Local>, ttl: Duration) -> bool {
        // negative ages (clock skew) never expire
        (now - self.created)
            .to_std()
            .map(|age| age > ttl)
            .unwrap_or(false)
    }
}

pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    default_font: String,
}

impl SessionStore {
    pub fn new(default_font: impl Into<String>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            default_font: default_font.into(),
        }
    }

    /// Opens a fresh session at the first step.
    pub async fn open(&self, identity: &str) -> WizardResult<Session> {
        self.open_at(identity, Local::now()).await
    }

    pub async fn open_at(&self, identity: &str, created: DateTime<Local>) -> WizardResult<Session> {
        let mut guard = self.sessions.lock().await;
        match guard.entry(identity.to_string()) {
            Entry::Occupied(_) => Err(WizardError::SessionAlreadyOpen),
            Entry::Vacant(slot) => {
                let session = Session::new(created, StickerDraft::new(&self.default_font));
                slot.insert(session.clone());
                tracing::info!("{}", logs::session_opened(identity));
                Ok(session)
            }
        }
    }

    /// Snapshot of the session for `identity`.
    pub async fn get(&self, identity: &str) -> WizardResult<Session> {
        let guard = self.sessions.lock().await;
        guard
            .get(identity)
            .cloned()
            .ok_or(WizardError::SessionNotFound)
    }

    /// Runs `f` on the live session while holding the store lock.
    pub async fn update<R>(
        &self,
        identity: &str,
        f: impl FnOnce(&mut Session) -> R,
    ) -> WizardResult<R> {
        let mut guard = self.sessions.lock().await;
        let session = guard
            .get_mut(identity)
            .ok_or(WizardError::SessionNotFound)?;
        Ok(f(session))
    }

    /// Removes the session and its sticker file. No-op when absent.
    pub async fn close(&self, identity: &str) {
        let removed = self.sessions.lock().await.remove(identity);
        if let Some(session) = removed {
            remove_artifact(session.artifact).await;
            tracing::info!("{}", logs::session_closed(identity));
        }
    }

    /// Closes every session older than `ttl`, returning how many were closed.
    pub async fn sweep_expired(&self, now: DateTime<Local>, ttl: Duration) -> usize {
        let mut expired = Vec::new();
        {
            let mut guard = self.sessions.lock().await;
            guard.retain(|identity, session| {
                if session.is_expired(now, ttl) {
                    expired.push((identity.clone(), session.artifact.take()));
                    false
                } else {
                    true
                }
            });
        }

        for (identity, artifact) in &expired {
            remove_artifact(artifact.clone()).await;
            tracing::info!("{}", logs::session_closed(identity));
        }
        expired.len()
    }

    pub async fn contains(&self, identity: &str) -> bool {
        self.sessions.lock().await.contains_key(identity)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

async fn remove_artifact(artifact: Option<PathBuf>) {
    let Some(path) = artifact else {
        return;
    };
    match tokio::fs::remove_file(&path).await {
        Ok(()) => tracing::debug!("Removed sticker {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("Sticker {} already gone", path.display())
        }
        Err(e) => tracing::warn!("Failed to remove sticker {}: {}", path.display(), e),
    }
}

/// Periodically closes expired sessions, every `ttl / 2`, until `shutdown` turns true.
pub fn spawn_sweeper(
    store: Arc<SessionStore>,
    ttl: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let period = (ttl / 2).max(Duration::from_millis(1));
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(period) => {
                    let closed = store.sweep_expired(Local::now(), ttl).await;
                    if closed > 0 {
                        tracing::info!("{}", logs::sessions_expired(closed));
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("Session sweeper stopped");
    })
}
