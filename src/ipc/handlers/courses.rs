use crate::catalog::CourseFilter;
use crate::certification::{complete_lesson, course_progress, enroll};
use crate::error::DomainError;
use crate::ipc::error::{domain_err, respond, HandlerResult};
use crate::ipc::helpers::{commit_user, current_user, optional_str, require_author, required_str};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_courses_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let filter = CourseFilter {
        category: optional_str(req, "category"),
        query: optional_str(req, "query"),
        instructor_id: optional_str(req, "instructorId"),
    };
    let courses = state.catalog.list_courses(&filter);
    Ok(json!({ "courses": courses }))
}

fn handle_courses_get(state: &mut AppState, req: &Request) -> HandlerResult {
    let course_id = required_str(req, "courseId")?;
    let course = state
        .catalog
        .course(&course_id)
        .ok_or_else(|| domain_err(&req.id, DomainError::course_not_found(&course_id)))?;
    Ok(json!({ "course": course }))
}

fn handle_courses_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    let user = require_author(state, req)?;
    let course_id = required_str(req, "courseId")?;
    let course = state
        .catalog
        .course(&course_id)
        .ok_or_else(|| domain_err(&req.id, DomainError::course_not_found(&course_id)))?;
    if !user.can_manage(course) {
        return Err(domain_err(
            &req.id,
            DomainError::Forbidden("only the owner or an admin may delete a course".into()),
        ));
    }
    let confirmed = req
        .params
        .get("confirm")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    if !confirmed {
        return Err(domain_err(
            &req.id,
            DomainError::ConfirmationRequired(format!("delete \"{}\"", course.title)),
        ));
    }

    let removed = state
        .catalog
        .delete_course(&course_id)
        .map_err(|e| domain_err(&req.id, e))?;
    if state
        .draft
        .as_ref()
        .and_then(|d| d.editing_course_id.as_deref())
        == Some(course_id.as_str())
    {
        state.draft = None;
    }
    tracing::info!(course_id = %removed.id, "course deleted");
    Ok(json!({ "deleted": removed.id }))
}

fn handle_courses_enroll(state: &mut AppState, req: &Request) -> HandlerResult {
    let mut user = current_user(state, req)?;
    let course_id = required_str(req, "courseId")?;
    let Some(course) = state.catalog.course_mut(&course_id) else {
        return Err(domain_err(&req.id, DomainError::course_not_found(&course_id)));
    };
    let newly = enroll(&mut user, &course_id);
    if newly {
        course.students_count += 1;
        commit_user(state, user);
    }
    Ok(json!({ "enrolled": true, "new": newly }))
}

fn handle_courses_progress(state: &mut AppState, req: &Request) -> HandlerResult {
    let user = current_user(state, req)?;
    let course_id = required_str(req, "courseId")?;
    let course = state
        .catalog
        .course(&course_id)
        .ok_or_else(|| domain_err(&req.id, DomainError::course_not_found(&course_id)))?;
    Ok(json!({
        "courseId": course_id,
        "progress": course_progress(&user, course),
        "completed": user.has_completed(&course_id),
    }))
}

fn handle_lessons_complete(state: &mut AppState, req: &Request) -> HandlerResult {
    let mut user = current_user(state, req)?;
    let lesson_id = required_str(req, "lessonId")?;
    let known = state
        .catalog
        .courses()
        .iter()
        .any(|c| c.lessons().any(|l| l.id == lesson_id));
    if !known {
        return Err(domain_err(
            &req.id,
            DomainError::NotFound {
                kind: "lesson",
                id: lesson_id,
            },
        ));
    }
    let newly = complete_lesson(&mut user, &lesson_id);
    if newly {
        commit_user(state, user);
    }
    Ok(json!({ "lessonId": lesson_id, "new": newly }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "courses.list" => handle_courses_list(state, req),
        "courses.get" => handle_courses_get(state, req),
        "courses.delete" => handle_courses_delete(state, req),
        "courses.enroll" => handle_courses_enroll(state, req),
        "courses.progress" => handle_courses_progress(state, req),
        "lessons.complete" => handle_lessons_complete(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
