//! # Help Command
//!
//! Handles `/start` and `/reset`.
//! Drops any open session and displays the main help menu to the user.

use crate::application::session::SessionStore;
use crate::domain::types::Directive;

pub async fn handle_reset(store: &SessionStore, identity: &str) -> Vec<Directive> {
    store.close(identity).await;
    vec![Directive::text(crate::strings::help::MAIN)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reset_closes_session() {
        let store = SessionStore::new("a.ttf");
        store.open("42").await.unwrap();

        let out = handle_reset(&store, "42").await;
        assert_eq!(out, vec![Directive::text(crate::strings::help::MAIN)]);
        assert!(!store.contains("42").await);

        // nothing open is fine too
        assert_eq!(handle_reset(&store, "42").await.len(), 1);
    }
}
