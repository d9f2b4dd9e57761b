//! Refresh token store - Mappa concorrente in memoria token -> utente
//!
//! I refresh token sono UUID v4 opachi, monouso: `consume` li rimuove e
//! il chiamante ne emette uno nuovo (rotazione). Lo store non è persistente
//! e vale per una sola istanza del server.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct RefreshEntry {
    user_id: i32,
    expires_at: DateTime<Utc>,
}

pub struct RefreshTokenStore {
    tokens: DashMap<String, RefreshEntry>,
    lifetime: Duration,
}

impl RefreshTokenStore {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            tokens: DashMap::new(),
            lifetime,
        }
    }

    /// Issues a new refresh token for `user_id`.
    #[instrument(skip(self))]
    pub fn issue(&self, user_id: i32) -> String {
        self.purge_expired();
        let token = Uuid::new_v4().to_string();
        self.tokens.insert(
            token.clone(),
            RefreshEntry {
                user_id,
                expires_at: Utc::now() + self.lifetime,
            },
        );
        debug!("Refresh token issued");
        token
    }

    /// Removes the token and returns its owner if it was still valid.
    #[instrument(skip(self, token))]
    pub fn consume(&self, token: &str) -> Option<i32> {
        let (_, entry) = self.tokens.remove(token)?;
        if entry.expires_at <= Utc::now() {
            debug!("Refresh token expired for user {}", entry.user_id);
            return None;
        }
        Some(entry.user_id)
    }

    /// Revokes every token belonging to `user_id`, returning how many were dropped.
    #[instrument(skip(self))]
    pub fn revoke_user(&self, user_id: i32) -> usize {
        let before = self.tokens.len();
        self.tokens.retain(|_, entry| entry.user_id != user_id);
        let revoked = before.saturating_sub(self.tokens.len());
        debug!("Revoked {} refresh tokens", revoked);
        revoked
    }

    pub fn purge_expired(&self) {
        let now = Utc::now();
        self.tokens.retain(|_, entry| entry.expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_is_single_use() {
        let store = RefreshTokenStore::new(Duration::days(1));
        let token = store.issue(7);

        assert_eq!(store.consume(&token), Some(7));
        assert_eq!(store.consume(&token), None);
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let store = RefreshTokenStore::new(Duration::seconds(-1));
        let token = store.issue(3);

        assert_eq!(store.consume(&token), None);
    }

    #[test]
    fn revoke_user_only_drops_that_users_tokens() {
        let store = RefreshTokenStore::new(Duration::days(1));
        let first = store.issue(1);
        let _second = store.issue(1);
        let other = store.issue(2);

        assert_eq!(store.revoke_user(1), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.consume(&first), None);
        assert_eq!(store.consume(&other), Some(2));
    }

    #[test]
    fn issue_purges_expired_entries() {
        let store = RefreshTokenStore::new(Duration::seconds(-1));
        store.issue(1);
        store.issue(2);
        // the second issue purged the first, the last one is already expired too
        assert_eq!(store.len(), 1);
        store.purge_expired();
        assert!(store.is_empty());
    }
}
