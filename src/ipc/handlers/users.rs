use crate::catalog::OnboardRequest;
use crate::ipc::error::{domain_err, err, respond, HandlerResult};
use crate::ipc::helpers::{optional_str, require_admin, required_str, sync_session_user, to_json};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_users_list(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, req)?;
    Ok(json!({ "users": state.catalog.users() }))
}

fn handle_onboard_instructor(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, req)?;
    let onboard = OnboardRequest {
        name: optional_str(req, "name").unwrap_or_default(),
        email: optional_str(req, "email").unwrap_or_default(),
        bio: optional_str(req, "bio").unwrap_or_default(),
        avatar: optional_str(req, "avatar").unwrap_or_default(),
    };
    let user = state
        .catalog
        .onboard_instructor(onboard)
        .map_err(|e| domain_err(&req.id, e))?;
    tracing::info!(user_id = %user.id, "instructor onboarded");
    Ok(json!({ "user": user }))
}

fn handle_set_verified(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, req)?;
    let user_id = required_str(req, "userId")?;
    let Some(verified) = req.params.get("verified").and_then(|v| v.as_bool()) else {
        return Err(err(&req.id, "bad_params", "missing verified", None));
    };
    let user = state
        .catalog
        .set_user_verified(&user_id, verified)
        .map_err(|e| domain_err(&req.id, e))?
        .clone();
    sync_session_user(state, &user);
    Ok(json!({ "user": user }))
}

fn handle_toggle_verified(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, req)?;
    let user_id = required_str(req, "userId")?;
    let user = state
        .catalog
        .toggle_user_verified(&user_id)
        .map_err(|e| domain_err(&req.id, e))?
        .clone();
    sync_session_user(state, &user);
    Ok(json!({ "user": user }))
}

fn handle_instructor_summary(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, req)?;
    let instructor_id = required_str(req, "instructorId")?;
    let summary = state
        .catalog
        .instructor_summary(&instructor_id)
        .map_err(|e| domain_err(&req.id, e))?;
    to_json(req, &summary)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "users.list" => handle_users_list(state, req),
        "users.onboardInstructor" => handle_onboard_instructor(state, req),
        "users.setVerified" => handle_set_verified(state, req),
        "users.toggleVerified" => handle_toggle_verified(state, req),
        "instructors.summary" => handle_instructor_summary(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
