//! Per-client session state carried in a signed cookie.
//!
//! [`enable`] loads the session before the handler runs and writes it back
//! afterwards. Handlers reach it through the [`Session`] extractor, which is a
//! cheap handle onto the same per-request record.

mod cookie;
mod layer;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde_json::Value;
use snippetbox_core::types::DbId;

use crate::error::AppError;

pub use cookie::{decode_record, encode_record, SessionRecord};
pub use layer::{enable, SESSION_COOKIE};

/// Session key holding the id of the logged-in user.
pub const AUTH_USER_KEY: &str = "authenticated_user_id";

/// Session key holding the one-shot status message.
pub const FLASH_KEY: &str = "flash";

struct Inner {
    record: SessionRecord,
    modified: bool,
}

/// Handle onto the current request's session.
///
/// Clones share the same record. The lock is only taken inside these methods,
/// never across an `.await`.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Mutex<Inner>>,
}

impl Session {
    pub fn new(record: SessionRecord) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                record,
                modified: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, key: &str, value: impl Into<Value>) {
        let mut inner = self.lock();
        inner.record.data.insert(key.to_string(), value.into());
        inner.modified = true;
    }

    /// Typed read. A value of the wrong shape reads as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let inner = self.lock();
        inner
            .record
            .data
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        let mut inner = self.lock();
        let removed = inner.record.data.remove(key);
        if removed.is_some() {
            inner.modified = true;
        }
        removed
    }

    pub fn put_flash(&self, message: &str) {
        self.insert(FLASH_KEY, message);
    }

    /// Read and clear the flash message.
    pub fn pop_flash(&self) -> Option<String> {
        self.remove(FLASH_KEY)
            .and_then(|value| value.as_str().map(str::to_string))
    }

    pub fn user_id(&self) -> Option<DbId> {
        self.get(AUTH_USER_KEY)
    }

    pub fn set_user_id(&self, id: DbId) {
        self.insert(AUTH_USER_KEY, id);
    }

    /// True once anything has been written or removed.
    pub fn is_modified(&self) -> bool {
        self.lock().modified
    }

    /// Copy of the current record, for encoding.
    pub fn snapshot(&self) -> SessionRecord {
        self.lock().record.clone()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::InternalError("Session layer is not installed".into()))
    }
}
