use crate::ipc::error::{domain_err, err, respond, HandlerResult};
use crate::ipc::helpers::{optional_str, persist_dark_mode, persist_session_user, required_str};
use crate::ipc::types::{AppState, Request};
use crate::session::AuthMethod;
use serde_json::json;

fn handle_login(state: &mut AppState, req: &Request) -> HandlerResult {
    let method = required_str(req, "method")?;
    let email = optional_str(req, "email");
    let user_id = optional_str(req, "userId");
    let method = AuthMethod::parse(&method, email.as_deref(), user_id.as_deref())
        .map_err(|e| domain_err(&req.id, e))?;

    let user = state
        .authenticator
        .authenticate(&state.catalog, &method)
        .map_err(|e| domain_err(&req.id, e))?;

    tracing::info!(user_id = %user.id, role = ?user.role, "signed in");
    state.draft = None;
    state.session.login(user);
    persist_session_user(state);
    Ok(json!({ "user": state.session.current() }))
}

fn handle_logout(state: &mut AppState, _req: &Request) -> HandlerResult {
    let previous = state.session.logout();
    state.draft = None;
    persist_session_user(state);
    if let Some(u) = previous.as_ref() {
        tracing::info!(user_id = %u.id, "signed out");
    }
    Ok(json!({ "signedOut": previous.is_some() }))
}

fn handle_session_get(state: &mut AppState, _req: &Request) -> HandlerResult {
    Ok(json!({
        "user": state.session.current(),
        "darkMode": state.session.dark_mode,
        "hasDraft": state.draft.is_some(),
    }))
}

fn handle_theme_set(state: &mut AppState, req: &Request) -> HandlerResult {
    let Some(dark) = req.params.get("darkMode").and_then(|v| v.as_bool()) else {
        return Err(err(&req.id, "bad_params", "missing darkMode", None));
    };
    state.session.dark_mode = dark;
    persist_dark_mode(state);
    Ok(json!({ "darkMode": dark }))
}

fn handle_theme_toggle(state: &mut AppState, _req: &Request) -> HandlerResult {
    state.session.dark_mode = !state.session.dark_mode;
    persist_dark_mode(state);
    Ok(json!({ "darkMode": state.session.dark_mode }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "auth.login" => handle_login(state, req),
        "auth.logout" => handle_logout(state, req),
        "session.get" => handle_session_get(state, req),
        "theme.get" => Ok(json!({ "darkMode": state.session.dark_mode })),
        "theme.set" => handle_theme_set(state, req),
        "theme.toggle" => handle_theme_toggle(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
