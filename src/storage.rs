//! Durable client-side session state.
//!
//! All persisted values go through [`Session`], which wraps a
//! [`KeyValueStore`]. In the browser that store is `window.localStorage`;
//! tests use [`MemoryStorage`].
//!
//! Nothing here is encrypted or signed. Tokens and order snapshots sit in
//! plain text on purpose; this app is a scanner fixture.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::checkout::{CompletedOrder, Order};
use crate::error::AppError;
use crate::payment::SavedCard;

pub const ACCESS_TOKEN: &str = "access_token";
pub const TOKEN_TYPE: &str = "token_type";
pub const USER: &str = "user";
pub const OAUTH_TOKEN: &str = "oauth_token";
pub const OAUTH_STATE: &str = "oauth_state";
pub const PENDING_ORDER: &str = "pending_order";
pub const LAST_ORDER: &str = "last_order";
pub const LAST_PAYMENT_ID: &str = "last_payment_id";
pub const SAVED_CARD: &str = "saved_card";

const ALL_KEYS: &[&str] = &[
    ACCESS_TOKEN,
    TOKEN_TYPE,
    USER,
    OAUTH_TOKEN,
    OAUTH_STATE,
    PENDING_ORDER,
    LAST_ORDER,
    LAST_PAYMENT_ID,
    SAVED_CARD,
];

/// Minimal string key/value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: &str);
}

/// `window.localStorage`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn local_storage() -> Result<web_sys::Storage, AppError> {
        gloo_utils::window()
            .local_storage()
            .ok()
            .flatten()
            .ok_or_else(|| AppError::Storage("localStorage is not available".into()))
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::local_storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        Self::local_storage()?
            .set_item(key, value)
            .map_err(|e| AppError::Storage(format!("failed to write {key}: {e:?}")))
    }

    fn remove(&self, key: &str) {
        if let Ok(storage) = Self::local_storage() {
            if let Err(err) = storage.remove_item(key) {
                tracing::warn!(key, error = ?err, "failed to remove key");
            }
        }
    }
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl PartialEq for MemoryStorage {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// User record stored after a password login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub username: String,
}

/// Typed view over the persisted session keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session<S> {
    store: S,
}

/// Session backed by `localStorage`, the one components use.
pub type BrowserSession = Session<BrowserStorage>;

impl<S: KeyValueStore> Session<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring malformed stored value");
                None
            }
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN)
    }

    pub fn token_type(&self) -> Option<String> {
        self.store.get(TOKEN_TYPE)
    }

    /// Persist a password-login result.
    pub fn store_login(
        &self,
        access_token: &str,
        token_type: &str,
        username: &str,
    ) -> Result<(), AppError> {
        self.store.set(ACCESS_TOKEN, access_token)?;
        self.store.set(TOKEN_TYPE, token_type)?;
        self.set_json(
            USER,
            &StoredUser {
                username: username.to_string(),
            },
        )
    }

    pub fn user(&self) -> Option<StoredUser> {
        self.get_json(USER)
    }

    pub fn oauth_token(&self) -> Option<String> {
        self.store.get(OAUTH_TOKEN)
    }

    pub fn set_oauth_token(&self, token: &str) -> Result<(), AppError> {
        self.store.set(OAUTH_TOKEN, token)
    }

    pub fn oauth_state(&self) -> Option<String> {
        self.store.get(OAUTH_STATE)
    }

    pub fn set_oauth_state(&self, state: &str) -> Result<(), AppError> {
        self.store.set(OAUTH_STATE, state)
    }

    pub fn pending_order(&self) -> Option<Order> {
        self.get_json(PENDING_ORDER)
    }

    pub fn set_pending_order(&self, order: &Order) -> Result<(), AppError> {
        self.set_json(PENDING_ORDER, order)
    }

    pub fn last_order(&self) -> Option<CompletedOrder> {
        self.get_json(LAST_ORDER)
    }

    pub fn set_last_order(&self, order: &CompletedOrder) -> Result<(), AppError> {
        self.set_json(LAST_ORDER, order)
    }

    pub fn last_payment_id(&self) -> Option<String> {
        self.store.get(LAST_PAYMENT_ID)
    }

    pub fn set_last_payment_id(&self, payment_id: &str) -> Result<(), AppError> {
        self.store.set(LAST_PAYMENT_ID, payment_id)
    }

    pub fn saved_card(&self) -> Option<SavedCard> {
        self.get_json(SAVED_CARD)
    }

    pub fn set_saved_card(&self, card: &SavedCard) -> Result<(), AppError> {
        self.set_json(SAVED_CARD, card)
    }

    /// True once either login path has left a token behind.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some() || self.oauth_token().is_some()
    }

    /// Remove every key this app writes. Used by logout.
    pub fn clear(&self) {
        for key in ALL_KEYS {
            self.store.remove(key);
        }
        tracing::info!("session cleared");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session() -> (MemoryStorage, Session<MemoryStorage>) {
        let store = MemoryStorage::new();
        (store.clone(), Session::new(store))
    }

    #[test]
    fn login_is_stored_in_plain_text() {
        let (store, session) = session();
        session.store_login("tok-123", "bearer", "admin").unwrap();

        assert_eq!(store.get(ACCESS_TOKEN).as_deref(), Some("tok-123"));
        assert_eq!(store.get(TOKEN_TYPE).as_deref(), Some("bearer"));
        assert_eq!(store.get(USER).as_deref(), Some(r#"{"username":"admin"}"#));
        assert_eq!(
            session.user(),
            Some(StoredUser {
                username: "admin".into()
            })
        );
        assert!(session.is_authenticated());
    }

    #[test]
    fn oauth_token_alone_authenticates() {
        let (_, session) = session();
        assert!(!session.is_authenticated());
        session.set_oauth_token("abc").unwrap();
        assert!(session.is_authenticated());
    }

    #[test]
    fn malformed_json_reads_as_none() {
        let (store, session) = session();
        store.set(USER, "not json").unwrap();
        assert!(session.user().is_none());
    }

    #[test]
    fn clear_removes_every_key() {
        let (store, session) = session();
        for key in ALL_KEYS {
            store.set(key, "x").unwrap();
        }
        store.set("unrelated", "kept").unwrap();
        assert_eq!(store.len(), ALL_KEYS.len() + 1);

        session.clear();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("unrelated").as_deref(), Some("kept"));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn memory_storage_clones_share_entries() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.set("k", "v").unwrap();
        assert_eq!(b.get("k").as_deref(), Some("v"));
        assert_eq!(a, b);
        assert_ne!(a, MemoryStorage::new());
    }
}
