//! In-memory collaborators for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use easyshop_core::Email;
use url::Url;

use super::{
    AuthSession, AuthUser, DataError, DataStore, IdentityError, IdentityProvider, OAuthProvider,
    SignUpOutcome,
};

/// A canned answer from [`FakeIdentity`].
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Reject {
        status: u16,
        code: Option<&'static str>,
        message: &'static str,
    },
}

impl<T: Clone> Reply<T> {
    pub const fn reject(status: u16, code: Option<&'static str>, message: &'static str) -> Self {
        Self::Reject {
            status,
            code,
            message,
        }
    }

    fn get(&self) -> Result<T, IdentityError> {
        match self {
            Self::Ok(value) => Ok(value.clone()),
            Self::Reject {
                status,
                code,
                message,
            } => Err(IdentityError::Rejected {
                status: *status,
                code: code.map(String::from),
                message: (*message).to_string(),
            }),
        }
    }
}

pub fn user(email: &str) -> AuthUser {
    AuthUser {
        id: format!("id-{email}"),
        email: Some(Email::new(email)),
        username: None,
    }
}

pub fn session(email: &str, access_token: &str) -> AuthSession {
    AuthSession {
        access_token: access_token.to_string(),
        refresh_token: format!("refresh-{access_token}"),
        expires_at: Some(chrono::Utc::now().timestamp() + 3600),
        user: user(email),
    }
}

/// Identity provider answering from fixed replies and recording calls.
pub struct FakeIdentity {
    pub get_user: Reply<AuthUser>,
    pub refresh: Reply<AuthSession>,
    pub sign_in: Reply<AuthSession>,
    pub sign_up: Reply<SignUpOutcome>,
    pub exchange: Reply<AuthSession>,
    pub sign_out: Reply<()>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl Default for FakeIdentity {
    fn default() -> Self {
        Self {
            get_user: Reply::reject(500, None, "get_user not configured"),
            refresh: Reply::reject(500, None, "refresh not configured"),
            sign_in: Reply::reject(500, None, "sign_in not configured"),
            sign_up: Reply::reject(500, None, "sign_up not configured"),
            exchange: Reply::reject(500, None, "exchange not configured"),
            sign_out: Reply::Ok(()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeIdentity {
    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    /// How many times `call` was made.
    pub fn calls(&self, call: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == call)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn get_user(&self, _access_token: &str) -> Result<AuthUser, IdentityError> {
        self.record("get_user");
        self.get_user.get()
    }

    async fn refresh_session(&self, _refresh_token: &str) -> Result<AuthSession, IdentityError> {
        self.record("refresh");
        self.refresh.get()
    }

    async fn sign_in_with_password(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<AuthSession, IdentityError> {
        self.record("sign_in");
        self.sign_in.get()
    }

    async fn sign_up(&self, _email: &str, _password: &str) -> Result<SignUpOutcome, IdentityError> {
        self.record("sign_up");
        self.sign_up.get()
    }

    fn authorize_url(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<Url, IdentityError> {
        let mut url = Url::parse("https://identity.test/auth/v1/authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", provider.as_str())
            .append_pair("redirect_to", redirect_to)
            .append_pair("code_challenge", code_challenge);
        Ok(url)
    }

    async fn exchange_code(
        &self,
        _auth_code: &str,
        _code_verifier: &str,
    ) -> Result<AuthSession, IdentityError> {
        self.record("exchange");
        self.exchange.get()
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), IdentityError> {
        self.record("sign_out");
        self.sign_out.get()
    }
}

/// Row store serving fixed rows per table.
#[derive(Default)]
pub struct FakeStore {
    tables: HashMap<&'static str, Result<Vec<serde_json::Value>, u16>>,
    delay: Option<Duration>,
    listed: Mutex<Vec<String>>,
}

impl FakeStore {
    #[must_use]
    pub fn with_rows(mut self, table: &'static str, rows: Vec<serde_json::Value>) -> Self {
        self.tables.insert(table, Ok(rows));
        self
    }

    #[must_use]
    pub fn with_failure(mut self, table: &'static str, status: u16) -> Self {
        self.tables.insert(table, Err(status));
        self
    }

    /// Answer every listing only after `delay`.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Tables whose listing was answered, in order.
    pub fn listed(&self) -> Vec<String> {
        self.listed.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataStore for FakeStore {
    async fn list(&self, table: &str, limit: u32) -> Result<Vec<serde_json::Value>, DataError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.listed.lock().unwrap().push(table.to_string());
        match self.tables.get(table) {
            Some(Ok(rows)) => Ok(rows.iter().take(limit as usize).cloned().collect()),
            Some(Err(status)) => Err(DataError::Status {
                status: *status,
                body: "fake failure".to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}
