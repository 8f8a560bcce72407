use crate::authoring::{CourseField, Draft, LessonField, ReorderKind, ReorderRequest};
use crate::error::DomainError;
use crate::ipc::error::{domain_err, err, respond, HandlerResult};
use crate::ipc::helpers::{
    optional_index, optional_str, require_author, required_index, required_raw_str, required_str,
    to_json,
};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn draft_mut<'a>(state: &'a mut AppState, req: &Request) -> Result<&'a mut Draft, serde_json::Value> {
    state
        .draft
        .as_mut()
        .ok_or_else(|| domain_err(&req.id, DomainError::NoDraft))
}

fn draft_json(state: &AppState, req: &Request) -> HandlerResult {
    let draft = state
        .draft
        .as_ref()
        .ok_or_else(|| domain_err(&req.id, DomainError::NoDraft))?;
    Ok(json!({ "draft": to_json(req, draft)? }))
}

fn handle_draft_open(state: &mut AppState, req: &Request) -> HandlerResult {
    let user = require_author(state, req)?;
    let draft = match optional_str(req, "courseId") {
        Some(course_id) => {
            let course = state
                .catalog
                .course(&course_id)
                .ok_or_else(|| domain_err(&req.id, DomainError::course_not_found(&course_id)))?;
            if !user.can_manage(course) {
                return Err(domain_err(
                    &req.id,
                    DomainError::Forbidden("only the owner or an admin may edit a course".into()),
                ));
            }
            Draft::from_course(course)
        }
        None => Draft::new(&user.name),
    };
    state.draft = Some(draft);
    draft_json(state, req)
}

fn handle_draft_cancel(state: &mut AppState, _req: &Request) -> HandlerResult {
    let discarded = state.draft.take().is_some();
    Ok(json!({ "discarded": discarded }))
}

fn handle_draft_next(state: &mut AppState, req: &Request) -> HandlerResult {
    draft_mut(state, req)?
        .next()
        .map_err(|e| domain_err(&req.id, e))?;
    draft_json(state, req)
}

fn handle_draft_back(state: &mut AppState, req: &Request) -> HandlerResult {
    draft_mut(state, req)?.back();
    draft_json(state, req)
}

fn handle_draft_set_field(state: &mut AppState, req: &Request) -> HandlerResult {
    let field = required_str(req, "field")?;
    let field = CourseField::parse(&field).map_err(|e| domain_err(&req.id, e))?;
    let value = required_raw_str(req, "value")?;
    draft_mut(state, req)?.set_field(field, value);
    draft_json(state, req)
}

fn handle_draft_select(state: &mut AppState, req: &Request) -> HandlerResult {
    let module_index = optional_index(req, "moduleIndex")?;
    let lesson_index = optional_index(req, "lessonIndex")?;
    draft_mut(state, req)?
        .select(module_index, lesson_index)
        .map_err(|e| domain_err(&req.id, e))?;
    draft_json(state, req)
}

fn handle_draft_add_module(state: &mut AppState, req: &Request) -> HandlerResult {
    draft_mut(state, req)?.add_module();
    draft_json(state, req)
}

fn handle_draft_add_lesson(state: &mut AppState, req: &Request) -> HandlerResult {
    let module_index = required_index(req, "moduleIndex")?;
    draft_mut(state, req)?
        .add_lesson(module_index)
        .map_err(|e| domain_err(&req.id, e))?;
    draft_json(state, req)
}

fn handle_draft_remove_module(state: &mut AppState, req: &Request) -> HandlerResult {
    let module_index = required_index(req, "moduleIndex")?;
    draft_mut(state, req)?
        .remove_module(module_index)
        .map_err(|e| domain_err(&req.id, e))?;
    draft_json(state, req)
}

fn handle_draft_remove_lesson(state: &mut AppState, req: &Request) -> HandlerResult {
    let module_index = required_index(req, "moduleIndex")?;
    let lesson_index = required_index(req, "lessonIndex")?;
    draft_mut(state, req)?
        .remove_lesson(module_index, lesson_index)
        .map_err(|e| domain_err(&req.id, e))?;
    draft_json(state, req)
}

fn handle_draft_update_module(state: &mut AppState, req: &Request) -> HandlerResult {
    let module_index = required_index(req, "moduleIndex")?;
    let title = required_raw_str(req, "title")?;
    draft_mut(state, req)?
        .set_module_title(module_index, title)
        .map_err(|e| domain_err(&req.id, e))?;
    draft_json(state, req)
}

fn handle_draft_update_lesson(state: &mut AppState, req: &Request) -> HandlerResult {
    let module_index = required_index(req, "moduleIndex")?;
    let lesson_index = required_index(req, "lessonIndex")?;
    let field = required_str(req, "field")?;
    let field = LessonField::parse(&field).map_err(|e| domain_err(&req.id, e))?;
    let value = match req.params.get("value") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Null) => None,
        _ => return Err(err(&req.id, "bad_params", "value must be a string or null", None)),
    };
    draft_mut(state, req)?
        .set_lesson_field(module_index, lesson_index, field, value)
        .map_err(|e| domain_err(&req.id, e))?;
    draft_json(state, req)
}

fn handle_draft_reorder(state: &mut AppState, req: &Request) -> HandlerResult {
    let kind = required_str(req, "kind")?;
    let reorder = ReorderRequest {
        kind: ReorderKind::parse(&kind).map_err(|e| domain_err(&req.id, e))?,
        source_index: required_index(req, "sourceIndex")?,
        dest_index: required_index(req, "destIndex")?,
        source_parent: optional_str(req, "sourceModuleId"),
        dest_parent: optional_str(req, "destModuleId"),
    };
    let changed = draft_mut(state, req)?
        .reorder(&reorder)
        .map_err(|e| domain_err(&req.id, e))?;
    let mut out = draft_json(state, req)?;
    out["changed"] = json!(changed);
    Ok(out)
}

fn handle_draft_finalize(state: &mut AppState, req: &Request) -> HandlerResult {
    let user = require_author(state, req)?;
    let draft = state
        .draft
        .as_ref()
        .ok_or_else(|| domain_err(&req.id, DomainError::NoDraft))?;
    let course = draft
        .build_course(&state.catalog, &user)
        .map_err(|e| domain_err(&req.id, e))?;

    state.draft = None;
    let outcome = state.catalog.add_or_replace_course(course.clone());
    tracing::info!(course_id = %course.id, ?outcome, "course published");
    Ok(json!({ "course": course }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "draft.open" => handle_draft_open(state, req),
        "draft.get" => draft_json(state, req),
        "draft.cancel" => handle_draft_cancel(state, req),
        "draft.next" => handle_draft_next(state, req),
        "draft.back" => handle_draft_back(state, req),
        "draft.setField" => handle_draft_set_field(state, req),
        "draft.select" => handle_draft_select(state, req),
        "draft.addModule" => handle_draft_add_module(state, req),
        "draft.addLesson" => handle_draft_add_lesson(state, req),
        "draft.removeModule" => handle_draft_remove_module(state, req),
        "draft.removeLesson" => handle_draft_remove_lesson(state, req),
        "draft.updateModule" => handle_draft_update_module(state, req),
        "draft.updateLesson" => handle_draft_update_lesson(state, req),
        "draft.reorder" => handle_draft_reorder(state, req),
        "draft.finalize" => handle_draft_finalize(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
