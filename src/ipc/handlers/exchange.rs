use crate::exchange::{export_courses, parse_import, read_import_file};
use crate::ipc::error::{domain_err, err, respond, HandlerResult};
use crate::ipc::helpers::{optional_str, require_author};
use crate::ipc::types::{AppState, Request};
use chrono::Local;
use serde_json::json;
use std::path::PathBuf;

fn handle_export(state: &mut AppState, req: &Request) -> HandlerResult {
    let user = require_author(state, req)?;
    let courses = state.catalog.courses_for_export(&user);
    let out_dir = optional_str(req, "outDir").map(PathBuf::from);
    let summary = export_courses(&courses, out_dir.as_deref(), Local::now().date_naive())
        .map_err(|e| err(&req.id, "io_failed", format!("{e:#}"), None))?;
    tracing::info!(count = summary.course_count, "courses exported");
    Ok(json!({
        "courseCount": summary.course_count,
        "path": summary.path.map(|p| p.to_string_lossy().to_string()),
        "document": summary.document,
    }))
}

fn handle_import(state: &mut AppState, req: &Request) -> HandlerResult {
    require_author(state, req)?;
    let text = match (
        req.params.get("text").and_then(|v| v.as_str()),
        optional_str(req, "path"),
    ) {
        (Some(t), _) => t.to_string(),
        (None, Some(p)) => read_import_file(&PathBuf::from(p))
            .map_err(|e| err(&req.id, "io_failed", format!("{e:#}"), None))?,
        (None, None) => return Err(err(&req.id, "bad_params", "missing text or path", None)),
    };

    let courses = parse_import(&text).map_err(|e| {
        tracing::warn!(error = %e, "import rejected");
        domain_err(&req.id, e)
    })?;
    let total = courses.len();
    let (inserted, replaced) = state.catalog.import_courses(courses);
    tracing::info!(total, inserted, replaced, "courses imported");
    Ok(json!({ "imported": total, "inserted": inserted, "replaced": replaced }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "courses.export" => handle_export(state, req),
        "courses.import" => handle_import(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
