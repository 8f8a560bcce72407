use crate::authoring::{expand_outline, CourseOutline};
use crate::error::DomainError;
use crate::ipc::error::{domain_err, err, respond, HandlerResult};
use crate::ipc::helpers::{optional_str, require_author, required_index, required_raw_str, required_str, to_json};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_ask(state: &mut AppState, req: &Request) -> HandlerResult {
    let message = required_str(req, "message")?;
    let context = optional_str(req, "context");
    let reply = state.assistant.ask(&message, context.as_deref());
    Ok(json!({ "reply": reply }))
}

fn handle_outline(state: &mut AppState, req: &Request) -> HandlerResult {
    require_author(state, req)?;
    let topic = required_str(req, "topic")?;
    let outline = state.assistant.outline(&topic);
    Ok(json!({ "outline": outline }))
}

fn handle_accept_outline(state: &mut AppState, req: &Request) -> HandlerResult {
    let user = require_author(state, req)?;
    let Some(raw) = req.params.get("outline") else {
        return Err(err(&req.id, "bad_params", "missing outline", None));
    };
    let outline: CourseOutline = serde_json::from_value(raw.clone())
        .map_err(|e| err(&req.id, "bad_params", format!("invalid outline: {e}"), None))?;
    let stamp = uuid::Uuid::new_v4().simple().to_string();
    let course = expand_outline(&outline, &user, &stamp).map_err(|e| domain_err(&req.id, e))?;
    state.catalog.add_or_replace_course(course.clone());
    tracing::info!(course_id = %course.id, "outline accepted");
    Ok(json!({ "course": course }))
}

fn handle_rewrite_lesson(state: &mut AppState, req: &Request) -> HandlerResult {
    let module_index = required_index(req, "moduleIndex")?;
    let lesson_index = required_index(req, "lessonIndex")?;
    let selection = required_raw_str(req, "selection")?;
    if selection.trim().is_empty() {
        return Err(err(&req.id, "bad_params", "selection must not be empty", None));
    }
    let draft = state
        .draft
        .as_ref()
        .ok_or_else(|| domain_err(&req.id, DomainError::NoDraft))?;
    // Position and selection are checked before the backend is called.
    draft
        .lesson_span(module_index, lesson_index, &selection)
        .map_err(|e| domain_err(&req.id, e))?;

    let rewritten = match state.assistant.rewrite(&selection) {
        Some(text) => {
            let Some(draft) = state.draft.as_mut() else {
                return Err(domain_err(&req.id, DomainError::NoDraft));
            };
            draft
                .replace_lesson_span(module_index, lesson_index, &selection, &text)
                .map_err(|e| domain_err(&req.id, e))?;
            true
        }
        None => false,
    };
    Ok(json!({ "rewritten": rewritten, "draft": to_json(req, &state.draft)? }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "assistant.ask" => handle_ask(state, req),
        "assistant.outline" => handle_outline(state, req),
        "assistant.acceptOutline" => handle_accept_outline(state, req),
        "assistant.rewriteLesson" => handle_rewrite_lesson(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
