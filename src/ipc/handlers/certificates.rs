use crate::ipc::error::{domain_err, respond, HandlerResult};
use crate::ipc::helpers::{commit_user, current_user, optional_str, persist_certificates, required_str, to_json};
use crate::ipc::types::{AppState, Request};
use chrono::Local;
use serde_json::json;

fn handle_complete(state: &mut AppState, req: &Request) -> HandlerResult {
    let course_id = required_str(req, "courseId")?;
    // Without a signed-in user this is a no-op, not an error.
    let Some(mut user) = state.session.current().cloned() else {
        return Ok(json!({ "certificate": null }));
    };

    let issued = state
        .certificates
        .complete_course(&state.catalog, &mut user, &course_id, Local::now())
        .map_err(|e| domain_err(&req.id, e))?;
    let Some(certificate) = issued else {
        return Ok(json!({ "certificate": null }));
    };

    commit_user(state, user);
    persist_certificates(state);
    tracing::info!(
        roll_number = %certificate.roll_number,
        course_id = %certificate.course_id,
        "certificate issued"
    );
    Ok(json!({ "certificate": certificate }))
}

fn handle_find(state: &mut AppState, req: &Request) -> HandlerResult {
    let course_id = required_str(req, "courseId")?;
    let student_id = match optional_str(req, "studentId") {
        Some(id) => id,
        None => current_user(state, req)?.id,
    };
    Ok(json!({ "certificate": state.certificates.find(&course_id, &student_id) }))
}

fn handle_verify(state: &mut AppState, req: &Request) -> HandlerResult {
    let roll = required_str(req, "rollNumber")?;
    let outcome = state
        .certificates
        .verify(&roll)
        .map_err(|e| domain_err(&req.id, e))?;
    to_json(req, &outcome)
}

fn handle_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let user = current_user(state, req)?;
    let certificates: Vec<_> = if user.role.is_admin() {
        state.certificates.all().iter().collect()
    } else {
        state.certificates.for_student(&user.id).collect()
    };
    Ok(json!({ "certificates": certificates }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "certificates.complete" => handle_complete(state, req),
        "certificates.find" => handle_find(state, req),
        "certificates.verify" => handle_verify(state, req),
        "certificates.list" => handle_list(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
