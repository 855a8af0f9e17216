//! Access/refresh token persistence.
//!
//! Tokens live in the OS keyring under the `merohealth` service, one
//! entry per token. A missing entry means "not logged in", not an error.

use std::sync::Mutex;

use crate::error::AuthError;

const SERVICE: &str = "merohealth";
const ACCESS_KEY: &str = "access_token";
const REFRESH_KEY: &str = "refresh_token";

/// A bearer access token plus the refresh token used to renew it.
#[derive(Debug, Clone)]
pub struct Tokens {
    pub access: String,
    pub refresh: String,
}

/// Credential persistence seam. The production implementation is the OS
/// keyring; tests use [`MemoryTokenStore`].
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<Tokens>, AuthError>;
    fn store(&self, tokens: &Tokens) -> Result<(), AuthError>;
    fn clear(&self) -> Result<(), AuthError>;
}

/// OS-keyring-backed token store.
#[derive(Debug, Default)]
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self
    }

    fn get(key: &str) -> Result<Option<String>, AuthError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(key: &str, value: &str) -> Result<(), AuthError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    fn delete(key: &str) -> Result<(), AuthError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<Tokens>, AuthError> {
        let access = Self::get(ACCESS_KEY)?;
        let refresh = Self::get(REFRESH_KEY)?;
        Ok(match (access, refresh) {
            (Some(access), Some(refresh)) => Some(Tokens { access, refresh }),
            _ => None,
        })
    }

    fn store(&self, tokens: &Tokens) -> Result<(), AuthError> {
        Self::set(ACCESS_KEY, &tokens.access)?;
        Self::set(REFRESH_KEY, &tokens.refresh)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        Self::delete(ACCESS_KEY)?;
        Self::delete(REFRESH_KEY)?;
        Ok(())
    }
}

/// In-memory token store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    inner: Mutex<Option<Tokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store, handy for tests that start logged in.
    pub fn with_tokens(access: &str, refresh: &str) -> Self {
        Self {
            inner: Mutex::new(Some(Tokens {
                access: access.to_string(),
                refresh: refresh.to_string(),
            })),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<Tokens>, AuthError> {
        Ok(self.inner.lock().ok().and_then(|guard| guard.clone()))
    }

    fn store(&self, tokens: &Tokens) -> Result<(), AuthError> {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = Some(tokens.clone());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = None;
        }
        Ok(())
    }
}
