//! Signed-in user, theme preference and their persisted snapshot.

use crate::catalog::Catalog;
use crate::db;
use crate::error::{DomainError, DomainResult};
use crate::model::{Certificate, User};
use crate::seed::DEMO_STUDENT_ID;
use rusqlite::Connection;
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct Session {
    current: Option<User>,
    pub dark_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    Google,
    Password { email: String },
    UserId(String),
}

impl AuthMethod {
    pub fn parse(method: &str, email: Option<&str>, user_id: Option<&str>) -> DomainResult<Self> {
        match method {
            "google" => Ok(Self::Google),
            "password" => Ok(Self::Password {
                email: email.unwrap_or_default().to_string(),
            }),
            "userId" => user_id
                .map(|id| Self::UserId(id.to_string()))
                .ok_or_else(|| DomainError::Validation("missing userId".into())),
            other => Err(DomainError::Validation(format!(
                "unknown auth method: {other}"
            ))),
        }
    }
}

/// Resolves a login attempt to a concrete user.
pub trait Authenticator {
    fn authenticate(&self, catalog: &Catalog, method: &AuthMethod) -> DomainResult<User>;
}

/// Demo sign-in: every flow resolves against the in-memory user list.
#[derive(Debug, Clone, Default)]
pub struct MockAuthenticator {
    pub delay: Duration,
}

impl Authenticator for MockAuthenticator {
    fn authenticate(&self, catalog: &Catalog, method: &AuthMethod) -> DomainResult<User> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        let demo_student = || {
            catalog
                .user(DEMO_STUDENT_ID)
                .cloned()
                .ok_or_else(|| DomainError::user_not_found(DEMO_STUDENT_ID))
        };
        match method {
            AuthMethod::Google => demo_student(),
            AuthMethod::Password { email } => match catalog.user_by_email(email) {
                Some(u) => Ok(u.clone()),
                None => demo_student(),
            },
            AuthMethod::UserId(id) => catalog
                .user(id)
                .cloned()
                .ok_or_else(|| DomainError::user_not_found(id)),
        }
    }
}

/// What a workspace had stored when it was opened.
#[derive(Debug, Clone, Default)]
pub struct Rehydrated {
    pub user: Option<User>,
    pub certificates: Vec<Certificate>,
    pub dark_mode: bool,
}

impl Session {
    pub fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn require_user(&self) -> DomainResult<&User> {
        self.current.as_ref().ok_or(DomainError::NotSignedIn)
    }

    pub fn login(&mut self, user: User) {
        self.current = Some(user);
    }

    pub fn logout(&mut self) -> Option<User> {
        self.current.take()
    }

    pub fn restore(&mut self, snapshot: &Rehydrated) {
        self.current = snapshot.user.clone();
        self.dark_mode = snapshot.dark_mode;
    }
}

/// Reads the stored snapshot. Unreadable entries are logged and treated as absent.
pub fn rehydrate(conn: &Connection) -> Rehydrated {
    let user = read_key::<User>(conn, db::KEY_USER);
    let certificates = read_key::<Vec<Certificate>>(conn, db::KEY_CERTIFICATES).unwrap_or_default();
    let dark_mode = read_key::<bool>(conn, db::KEY_DARK_MODE).unwrap_or(false);
    Rehydrated {
        user,
        certificates,
        dark_mode,
    }
}

fn read_key<T: serde::de::DeserializeOwned>(conn: &Connection, key: &str) -> Option<T> {
    match db::settings_get_json(conn, key) {
        Ok(Some(v)) => match serde_json::from_value(v) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring malformed stored value");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored value");
            None
        }
    }
}

pub fn persist_user(conn: &Connection, user: Option<&User>) -> anyhow::Result<()> {
    match user {
        Some(u) => db::settings_set_json(conn, db::KEY_USER, &serde_json::to_value(u)?),
        None => db::settings_delete(conn, db::KEY_USER),
    }
}

pub fn persist_certificates(conn: &Connection, certs: &[Certificate]) -> anyhow::Result<()> {
    db::settings_set_json(conn, db::KEY_CERTIFICATES, &serde_json::to_value(certs)?)
}

pub fn persist_dark_mode(conn: &Connection, dark_mode: bool) -> anyhow::Result<()> {
    db::settings_set_json(conn, db::KEY_DARK_MODE, &json!(dark_mode))
}
