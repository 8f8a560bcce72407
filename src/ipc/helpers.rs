use crate::error::DomainError;
use crate::ipc::error::{domain_err, err};
use crate::ipc::types::{AppState, Request};
use crate::model::User;
use crate::session;

pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

/// Like `required_str` but keeps the value exactly as sent (empty allowed).
pub fn required_raw_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

pub fn optional_str(req: &Request, key: &str) -> Option<String> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn required_index(req: &Request, key: &str) -> Result<usize, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_u64())
        .map(|v| v as usize)
        .ok_or_else(|| {
            err(
                &req.id,
                "bad_params",
                format!("missing or negative {}", key),
                None,
            )
        })
}

pub fn optional_index(req: &Request, key: &str) -> Result<Option<usize>, serde_json::Value> {
    match req.params.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(_) => required_index(req, key).map(Some),
    }
}

pub fn current_user(state: &AppState, req: &Request) -> Result<User, serde_json::Value> {
    state
        .session
        .require_user()
        .cloned()
        .map_err(|e| domain_err(&req.id, e))
}

pub fn require_author(state: &AppState, req: &Request) -> Result<User, serde_json::Value> {
    let user = current_user(state, req)?;
    if !user.role.can_author() {
        return Err(domain_err(
            &req.id,
            DomainError::Forbidden("instructor or admin role required".into()),
        ));
    }
    Ok(user)
}

pub fn require_admin(state: &AppState, req: &Request) -> Result<User, serde_json::Value> {
    let user = current_user(state, req)?;
    if !user.role.is_admin() {
        return Err(domain_err(
            &req.id,
            DomainError::Forbidden("admin role required".into()),
        ));
    }
    Ok(user)
}

/// Stores the updated signed-in user in the session and the catalog, then persists it.
pub fn commit_user(state: &mut AppState, user: User) {
    state.catalog.upsert_user(&user);
    state.session.login(user);
    persist_session_user(state);
}

/// Picks up a catalog-side change to whoever is signed in, so later progress writes
/// start from the current record.
pub fn sync_session_user(state: &mut AppState, user: &User) {
    if state.session.current().map(|u| u.id.as_str()) != Some(user.id.as_str()) {
        return;
    }
    state.session.login(user.clone());
    persist_session_user(state);
}

pub fn persist_session_user(state: &AppState) {
    let Some(conn) = state.db.as_ref() else {
        return;
    };
    if let Err(e) = session::persist_user(conn, state.session.current()) {
        tracing::warn!(error = %e, "failed to persist session user");
    }
}

pub fn persist_certificates(state: &AppState) {
    let Some(conn) = state.db.as_ref() else {
        return;
    };
    if let Err(e) = session::persist_certificates(conn, state.certificates.all()) {
        tracing::warn!(error = %e, "failed to persist certificates");
    }
}

pub fn persist_dark_mode(state: &AppState) {
    let Some(conn) = state.db.as_ref() else {
        return;
    };
    if let Err(e) = session::persist_dark_mode(conn, state.session.dark_mode) {
        tracing::warn!(error = %e, "failed to persist theme preference");
    }
}

pub fn to_json<T: serde::Serialize>(req: &Request, v: &T) -> Result<serde_json::Value, serde_json::Value> {
    serde_json::to_value(v).map_err(|e| err(&req.id, "internal", e.to_string(), None))
}
