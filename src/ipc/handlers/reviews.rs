use crate::ipc::error::{domain_err, err, respond, HandlerResult};
use crate::ipc::helpers::{current_user, required_raw_str, required_str};
use crate::ipc::types::{AppState, Request};
use crate::reviews::submit_review;
use chrono::Local;
use serde_json::json;

fn handle_submit(state: &mut AppState, req: &Request) -> HandlerResult {
    let user = current_user(state, req)?;
    let course_id = required_str(req, "courseId")?;
    let Some(rating) = req.params.get("rating").and_then(|v| v.as_i64()) else {
        return Err(err(&req.id, "bad_params", "rating must be an integer", None));
    };
    let comment = required_raw_str(req, "comment")?;

    let course = submit_review(
        &mut state.catalog,
        &user,
        &course_id,
        rating,
        &comment,
        Local::now().date_naive(),
    )
    .map_err(|e| domain_err(&req.id, e))?;
    tracing::info!(course_id = %course.id, rating = course.rating, "review added");
    Ok(json!({ "course": course }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "reviews.submit" => handle_submit(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
