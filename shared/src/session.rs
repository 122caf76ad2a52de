//! Signed cookie sessions
//!
//! Session state lives entirely in one cookie:
//! `base64url(json) "." hex(hmac_sha256(secret, base64url(json)))`.
//! A cookie that fails verification or decoding is dropped and the request
//! proceeds with an empty session.
//!
//! Handlers take a [`Session`] extractor, mutate it, and return it as part
//! of the response; `Set-Cookie` is only emitted when something changed.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponseParts, ResponseParts};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use http::header::{COOKIE, SET_COOKIE};
use http::request::Parts;
use http::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::Sha256;

use crate::error::AppError;

pub const DEFAULT_COOKIE_NAME: &str = "session";

/// Flash message severity, mirrored as a CSS class in the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
    Info,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Error => "error",
            FlashLevel::Info => "info",
        }
    }
}

/// One-shot message shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// Everything persisted in the session cookie
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flashes: Vec<Flash>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, Value>,
}

/// Where session data is read from and written to
pub trait SessionStore: Send + Sync {
    /// Load the session for a request; never fails, falls back to empty
    fn load(&self, headers: &HeaderMap) -> SessionData;

    /// Produce the `Set-Cookie` value persisting `data`
    fn save(&self, data: &SessionData) -> Result<HeaderValue, AppError>;
}

/// HMAC-signed cookie session store
pub struct CookieSessionStore {
    key: Vec<u8>,
    cookie_name: String,
}

impl CookieSessionStore {
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }

    fn mac(&self) -> Result<Hmac<Sha256>, AppError> {
        Hmac::<Sha256>::new_from_slice(&self.key)
            .map_err(|_| AppError::internal("Session key error"))
    }

    /// Serialize and sign session data into a cookie value
    pub fn encode(&self, data: &SessionData) -> Result<String, AppError> {
        let json = serde_json::to_vec(data)
            .map_err(|e| AppError::internal(format!("Session encode failed: {e}")))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    /// Verify and deserialize a cookie value; `None` when tampered or malformed
    pub fn decode(&self, value: &str) -> Option<SessionData> {
        let (payload, signature) = value.rsplit_once('.')?;
        let sig_bytes = hex::decode(signature).ok()?;
        let mut mac = self.mac().ok()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&sig_bytes).ok()?;
        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }

    fn cookie_value<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .flat_map(|h| h.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.cookie_name)
            .map(|(_, value)| value)
    }
}

impl SessionStore for CookieSessionStore {
    fn load(&self, headers: &HeaderMap) -> SessionData {
        let Some(raw) = self.cookie_value(headers) else {
            return SessionData::default();
        };
        match self.decode(raw) {
            Some(data) => data,
            None => {
                tracing::warn!("Discarding session cookie with invalid signature");
                SessionData::default()
            }
        }
    }

    fn save(&self, data: &SessionData) -> Result<HeaderValue, AppError> {
        let value = self.encode(data)?;
        let cookie = format!(
            "{}={value}; Path=/; HttpOnly; SameSite=Lax",
            self.cookie_name
        );
        HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::internal(format!("Invalid session cookie: {e}")))
    }
}

/// Shared handle to the configured store, placed in each app's state
#[derive(Clone)]
pub struct Sessions(Arc<dyn SessionStore>);

impl Sessions {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self(Arc::new(store))
    }

    pub fn cookie(secret: &str) -> Self {
        Self::new(CookieSessionStore::new(secret))
    }
}

/// Request-scoped session
#[derive(Clone)]
pub struct Session {
    data: SessionData,
    store: Sessions,
    modified: bool,
}

impl Session {
    pub fn new(store: Sessions, data: SessionData) -> Self {
        Self {
            data,
            store,
            modified: false,
        }
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn flash(&mut self, level: FlashLevel, message: impl Into<String>) {
        self.data.flashes.push(Flash {
            level,
            message: message.into(),
        });
        self.modified = true;
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.flash(FlashLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.flash(FlashLevel::Error, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.flash(FlashLevel::Info, message);
    }

    /// Drain pending flash messages for rendering
    pub fn take_flashes(&mut self) -> Vec<Flash> {
        if self.data.flashes.is_empty() {
            return Vec::new();
        }
        self.modified = true;
        std::mem::take(&mut self.data.flashes)
    }

    /// Read a typed value; a value that no longer deserializes reads as `None`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .values
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn insert<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), AppError> {
        let v = serde_json::to_value(value)
            .map_err(|e| AppError::internal(format!("Session value encode failed: {e}")))?;
        self.data.values.insert(key.to_string(), v);
        self.modified = true;
        Ok(())
    }

    pub fn remove(&mut self, key: &str) {
        if self.data.values.remove(key).is_some() {
            self.modified = true;
        }
    }
}

impl<S> FromRequestParts<S> for Session
where
    Sessions: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = Sessions::from_ref(state);
        let data = store.0.load(&parts.headers);
        Ok(Session::new(store, data))
    }
}

impl IntoResponseParts for Session {
    type Error = AppError;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if self.modified {
            let cookie = self.store.0.save(&self.data)?;
            res.headers_mut().append(SET_COOKIE, cookie);
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CookieSessionStore {
        CookieSessionStore::new("test-secret")
    }

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; session={value}")).unwrap(),
        );
        headers
    }

    #[test]
    fn test_signed_cookie_is_read_back() {
        let store = store();
        let mut data = SessionData::default();
        data.values.insert("cart".into(), serde_json::json!({"3": 2}));
        data.flashes.push(Flash {
            level: FlashLevel::Success,
            message: "Saved".into(),
        });

        let encoded = store.encode(&data).unwrap();
        let loaded = store.load(&headers_with_cookie(&encoded));
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_tampered_cookie_yields_empty_session() {
        let store = store();
        let mut data = SessionData::default();
        data.values.insert("cart".into(), serde_json::json!({"1": 1}));
        let encoded = store.encode(&data).unwrap();

        let forged_payload = URL_SAFE_NO_PAD.encode(br#"{"values":{"cart":{"1":99}}}"#);
        let (_, sig) = encoded.rsplit_once('.').unwrap();
        let forged = format!("{forged_payload}.{sig}");

        assert_eq!(store.load(&headers_with_cookie(&forged)), SessionData::default());
        assert_eq!(store.load(&headers_with_cookie("garbage")), SessionData::default());
    }

    #[test]
    fn test_other_secret_rejects_cookie() {
        let encoded = store().encode(&SessionData::default()).unwrap();
        assert!(CookieSessionStore::new("other").decode(&encoded).is_none());
    }

    #[test]
    fn test_missing_cookie_is_empty() {
        assert_eq!(store().load(&HeaderMap::new()), SessionData::default());
    }

    #[test]
    fn test_set_cookie_attributes() {
        let value = store().save(&SessionData::default()).unwrap();
        let value = value.to_str().unwrap();
        assert!(value.starts_with("session="));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("Path=/"));
    }

    #[test]
    fn test_session_tracks_modification() {
        let mut session = Session::new(Sessions::new(store()), SessionData::default());
        assert!(!session.is_modified());
        assert!(session.take_flashes().is_empty());
        assert!(!session.is_modified());

        session.error("Fill in all fields.");
        assert!(session.is_modified());
        let flashes = session.take_flashes();
        assert_eq!(flashes.len(), 1);
        assert_eq!(flashes[0].level, FlashLevel::Error);
        assert!(session.data().flashes.is_empty());
    }

    #[test]
    fn test_typed_values() {
        let mut session = Session::new(Sessions::new(store()), SessionData::default());
        session.insert("count", &3_i64).unwrap();
        assert_eq!(session.get::<i64>("count"), Some(3));
        assert_eq!(session.get::<String>("count"), None);
        session.remove("count");
        assert_eq!(session.get::<i64>("count"), None);
    }
}
