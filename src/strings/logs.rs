pub fn config_loaded(path: &str) -> String {
    format!("Loaded configuration from {path}")
}

pub const CONFIG_READ_ERROR: &str = "Failed to read config.yaml";

pub fn logged_in(user: &str) -> String {
    format!("Logged in as {user}")
}

pub fn setting_display_name(name: &str) -> String {
    format!("Setting display name to: {name}")
}

pub fn set_display_name_fail(err: &str) -> String {
    format!("Failed to set display name: {err}")
}

pub const SYNC_LOOP_START: &str = "Starting sync loop...";

pub fn sync_loop_fail(err: &str) -> String {
    format!("Sync loop failed: {err}")
}

pub const SHUTDOWN: &str = "Shutting down...";

pub fn invite_received(room_id: &str) -> String {
    format!("💌 Received invite for room {room_id}")
}

pub fn join_invite_fail(err: &str) -> String {
    format!("Failed to join room after invite: {err}")
}

pub fn access_denied(sender: &str) -> String {
    format!("Rejected message from unauthorized sender {sender}")
}

pub fn session_opened(identity: &str) -> String {
    format!("Session opened for {identity}")
}

pub fn session_closed(identity: &str) -> String {
    format!("Session closed for {identity}")
}

pub fn sessions_expired(count: usize) -> String {
    format!("Expiry sweep closed {count} session(s)")
}

pub fn sticker_saved(path: &str) -> String {
    format!("Sticker saved to {path}")
}

pub fn delivery_failed(kind: &str, room: &str, err: &str) -> String {
    format!("Failed to deliver {kind} to {room}: {err}")
}
