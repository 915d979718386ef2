//! Authentication capability consumed by the uploader.
//!
//! The uploader only ever asks [`AuthContext::is_signed_in`]. Signing in and
//! out belongs to whoever owns the auth provider (the navigation bar in a
//! UI, the CLI flags in this crate's binary).

use anyhow::Result;
use async_trait::async_trait;
use std::sync::RwLock;
use uuid::Uuid;

#[async_trait]
pub trait AuthContext: Send + Sync {
    fn is_signed_in(&self) -> bool;
    fn user_name(&self) -> Option<String>;
    fn user_id(&self) -> Option<String>;
    /// Returns whether the user ended up signed in.
    async fn sign_in(&self) -> Result<bool>;
    /// Returns whether the user ended up signed out.
    async fn sign_out(&self) -> Result<bool>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub user_name: String,
}

impl Identity {
    /// Identity with a freshly generated id.
    pub fn named(user_name: impl Into<String>) -> Self {
        Self {
            user_id: Uuid::new_v4().to_string(),
            user_name: user_name.into(),
        }
    }
}

/// In-process auth provider. `sign_in` succeeds only when an identity to
/// sign in as was configured.
pub struct LocalAuth {
    account: Option<Identity>,
    current: RwLock<Option<Identity>>,
}

impl LocalAuth {
    /// Signed out, with no account to sign in to.
    pub fn anonymous() -> Self {
        Self {
            account: None,
            current: RwLock::new(None),
        }
    }

    /// Signed out, with `account` available for `sign_in`.
    pub fn signed_out(account: Identity) -> Self {
        Self {
            account: Some(account),
            current: RwLock::new(None),
        }
    }

    pub fn signed_in(account: Identity) -> Self {
        Self {
            current: RwLock::new(Some(account.clone())),
            account: Some(account),
        }
    }

    /// Navbar greeting, `None` while signed out.
    pub fn greeting(&self) -> Option<String> {
        self.is_signed_in().then(|| match self.user_name() {
            Some(name) => format!("Hi, {name}"),
            None => "Sign In".to_string(),
        })
    }

    fn read_current(&self) -> Option<Identity> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => {
                tracing::error!("Auth lock poisoned during read, recovering");
                poisoned.into_inner().clone()
            }
        }
    }

    fn write_current(&self, value: Option<Identity>) {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("Auth lock poisoned during write, recovering");
                poisoned.into_inner()
            }
        };
        *guard = value;
    }
}

#[async_trait]
impl AuthContext for LocalAuth {
    fn is_signed_in(&self) -> bool {
        self.read_current().is_some()
    }

    fn user_name(&self) -> Option<String> {
        self.read_current().map(|id| id.user_name)
    }

    fn user_id(&self) -> Option<String> {
        self.read_current().map(|id| id.user_id)
    }

    async fn sign_in(&self) -> Result<bool> {
        let Some(account) = self.account.clone() else {
            tracing::warn!("Sign in rejected: no account configured");
            return Ok(false);
        };
        tracing::info!(user = %account.user_name, "Signed in");
        self.write_current(Some(account));
        Ok(true)
    }

    async fn sign_out(&self) -> Result<bool> {
        if let Some(previous) = self.read_current() {
            tracing::info!(user = %previous.user_name, "Signed out");
        }
        self.write_current(None);
        Ok(true)
    }
}
