use crate::error::{DomainError, DomainResult};
use crate::model::Course;
use anyhow::Context;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub const EXPORT_FILE_PREFIX: &str = "edupro_courses_backup_";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub path: Option<PathBuf>,
    pub course_count: usize,
    pub document: String,
}

pub fn export_file_name(day: NaiveDate) -> String {
    format!("{}{}.json", EXPORT_FILE_PREFIX, day.format("%Y-%m-%d"))
}

pub fn render_export(courses: &[Course]) -> anyhow::Result<String> {
    serde_json::to_string_pretty(courses).context("failed to serialize courses")
}

/// Renders the document and, when `out_dir` is given, writes it there under a dated name.
pub fn export_courses(
    courses: &[Course],
    out_dir: Option<&Path>,
    day: NaiveDate,
) -> anyhow::Result<ExportSummary> {
    let document = render_export(courses)?;
    let path = match out_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory {}", dir.to_string_lossy()))?;
            let p = dir.join(export_file_name(day));
            std::fs::write(&p, &document)
                .with_context(|| format!("failed to write {}", p.to_string_lossy()))?;
            Some(p)
        }
        None => None,
    };
    Ok(ExportSummary {
        path,
        course_count: courses.len(),
        document,
    })
}

/// Validates an import document. Nothing is returned unless the whole document is usable.
pub fn parse_import(text: &str) -> DomainResult<Vec<Course>> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        DomainError::InvalidImport(format!(
            "Failed to parse JSON file. Ensure it is a valid backup. ({e})"
        ))
    })?;
    let items = value.as_array().ok_or_else(|| {
        DomainError::InvalidImport("Invalid JSON format. Please upload a course array.".into())
    })?;
    if let Some(first) = items.first() {
        let has = |key: &str| {
            first
                .get(key)
                .and_then(|v| v.as_str())
                .map(|s| !s.is_empty())
                .unwrap_or(false)
        };
        if !has("id") || !has("title") {
            return Err(DomainError::InvalidImport(
                "Invalid JSON structure. Must be an array of courses.".into(),
            ));
        }
    }
    serde_json::from_value(value).map_err(|e| {
        DomainError::InvalidImport(format!("course entry does not match the course shape: {e}"))
    })
}

pub fn read_import_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read import file {}", path.to_string_lossy()))
}
