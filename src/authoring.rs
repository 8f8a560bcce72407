//! Course-authoring draft and its three-step wizard.
//!
//! A `Draft` is a staging copy of a course. It is edited in place, walked through
//! Essentials -> Structure -> Content, and turned into a `Course` by `build_course`.
//! Reordering is plain remove-at-index / insert-at-index on the module and lesson
//! lists; every multi-list change is computed on a copy and swapped in whole.

use crate::catalog::Catalog;
use crate::error::{DomainError, DomainResult};
use crate::model::{
    new_id, placeholder_thumbnail, Course, Lesson, Module, User, DEFAULT_CATEGORY,
    DEFAULT_COURSE_RATING,
};
use serde::{Deserialize, Serialize};

pub const NEW_COURSE_DURATION: &str = "TBD";
pub const NEW_LESSON_DURATION: &str = "5:00";

const AI_COURSE_PRICE: f64 = 99.99;
const AI_COURSE_CATEGORY: &str = "Artificial Intelligence";
const AI_COURSE_DURATION: &str = "AI Generated";
const AI_LESSON_DURATION: &str = "10:00";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    Essentials,
    Structure,
    Content,
}

impl WizardStep {
    pub fn label(self) -> &'static str {
        match self {
            WizardStep::Essentials => "Essentials",
            WizardStep::Structure => "Structure",
            WizardStep::Content => "Content",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseField {
    Title,
    Description,
    Price,
    Thumbnail,
    Category,
    InstructorName,
}

impl CourseField {
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "title" => Ok(Self::Title),
            "description" => Ok(Self::Description),
            "price" => Ok(Self::Price),
            "thumbnail" => Ok(Self::Thumbnail),
            "category" => Ok(Self::Category),
            "instructorName" => Ok(Self::InstructorName),
            other => Err(DomainError::Validation(format!("unknown course field: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonField {
    Title,
    Duration,
    VideoUrl,
    Content,
}

impl LessonField {
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "title" => Ok(Self::Title),
            "duration" => Ok(Self::Duration),
            "videoUrl" => Ok(Self::VideoUrl),
            "content" => Ok(Self::Content),
            other => Err(DomainError::Validation(format!("unknown lesson field: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderKind {
    Module,
    Lesson,
}

impl ReorderKind {
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "module" => Ok(Self::Module),
            "lesson" => Ok(Self::Lesson),
            other => Err(DomainError::Validation(format!("unknown reorder kind: {other}"))),
        }
    }
}

/// A finished drag: which list the item left and where it landed. Lesson parents are
/// module ids; module moves ignore them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderRequest {
    pub kind: ReorderKind,
    pub source_index: usize,
    pub dest_index: usize,
    pub source_parent: Option<String>,
    pub dest_parent: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPointer {
    pub module_index: usize,
    pub lesson_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub editing_course_id: Option<String>,
    pub step: WizardStep,
    pub title: String,
    pub description: String,
    pub price: String,
    pub thumbnail: String,
    pub category: String,
    pub instructor_name: String,
    pub modules: Vec<Module>,
    pub active_module: Option<usize>,
    pub active_lesson: Option<LessonPointer>,
}

/// Outline produced by the AI collaborator for a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseOutline {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub modules: Vec<OutlineModule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineModule {
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<String>,
}

impl Draft {
    pub fn new(instructor_name: &str) -> Self {
        Self {
            editing_course_id: None,
            step: WizardStep::Essentials,
            title: String::new(),
            description: String::new(),
            price: String::new(),
            thumbnail: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            instructor_name: instructor_name.to_string(),
            modules: Vec::new(),
            active_module: None,
            active_lesson: None,
        }
    }

    pub fn from_course(course: &Course) -> Self {
        Self {
            editing_course_id: Some(course.id.clone()),
            step: WizardStep::Essentials,
            title: course.title.clone(),
            description: course.description.clone(),
            price: course.price.to_string(),
            thumbnail: course.thumbnail.clone(),
            category: course.category.clone(),
            instructor_name: course.instructor_name.clone(),
            modules: course.modules.clone(),
            active_module: None,
            active_lesson: None,
        }
    }

    pub fn next(&mut self) -> DomainResult<WizardStep> {
        self.step = match self.step {
            WizardStep::Essentials => {
                self.require_title(WizardStep::Essentials)?;
                WizardStep::Structure
            }
            WizardStep::Structure => {
                if self.modules.is_empty() {
                    return Err(DomainError::WizardGuard {
                        step: WizardStep::Structure.label(),
                        reason: "add at least one module".into(),
                    });
                }
                WizardStep::Content
            }
            WizardStep::Content => {
                return Err(DomainError::WizardGuard {
                    step: WizardStep::Content.label(),
                    reason: "last step; finalize instead".into(),
                })
            }
        };
        Ok(self.step)
    }

    pub fn back(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::Essentials | WizardStep::Structure => WizardStep::Essentials,
            WizardStep::Content => WizardStep::Structure,
        };
        self.step
    }

    fn require_title(&self, step: WizardStep) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::WizardGuard {
                step: step.label(),
                reason: "Please enter a course title.".into(),
            });
        }
        Ok(())
    }

    pub fn set_field(&mut self, field: CourseField, value: String) {
        match field {
            CourseField::Title => self.title = value,
            CourseField::Description => self.description = value,
            CourseField::Price => self.price = value,
            CourseField::Thumbnail => self.thumbnail = value,
            CourseField::Category => self.category = value,
            CourseField::InstructorName => self.instructor_name = value,
        }
    }

    pub fn add_module(&mut self) -> usize {
        self.modules.push(Module {
            id: new_id("m"),
            title: "Untitled Module".to_string(),
            lessons: Vec::new(),
        });
        let idx = self.modules.len() - 1;
        self.active_module = Some(idx);
        idx
    }

    pub fn add_lesson(&mut self, module_index: usize) -> DomainResult<usize> {
        let module = self.module_mut(module_index)?;
        module.lessons.push(Lesson {
            id: new_id("l"),
            title: "Untitled Lesson".to_string(),
            duration: NEW_LESSON_DURATION.to_string(),
            video_url: None,
            content: Some(String::new()),
        });
        let lesson_index = module.lessons.len() - 1;
        self.active_lesson = Some(LessonPointer {
            module_index,
            lesson_index,
        });
        Ok(lesson_index)
    }

    pub fn remove_module(&mut self, index: usize) -> DomainResult<Module> {
        self.module(index)?;
        let selection = self.selection_ids();
        let removed = self.modules.remove(index);
        self.restore_selection(selection);
        Ok(removed)
    }

    pub fn remove_lesson(&mut self, module_index: usize, lesson_index: usize) -> DomainResult<Lesson> {
        self.lesson(module_index, lesson_index)?;
        let selection = self.selection_ids();
        let removed = self.modules[module_index].lessons.remove(lesson_index);
        self.restore_selection(selection);
        Ok(removed)
    }

    pub fn set_module_title(&mut self, module_index: usize, title: String) -> DomainResult<()> {
        self.module_mut(module_index)?.title = title;
        Ok(())
    }

    /// `None` clears the optional fields; title and duration become empty.
    pub fn set_lesson_field(
        &mut self,
        module_index: usize,
        lesson_index: usize,
        field: LessonField,
        value: Option<String>,
    ) -> DomainResult<()> {
        let lesson = self.lesson_mut(module_index, lesson_index)?;
        match field {
            LessonField::Title => lesson.title = value.unwrap_or_default(),
            LessonField::Duration => lesson.duration = value.unwrap_or_default(),
            LessonField::VideoUrl => lesson.video_url = value,
            LessonField::Content => lesson.content = value,
        }
        Ok(())
    }

    pub fn select(&mut self, module_index: Option<usize>, lesson_index: Option<usize>) -> DomainResult<()> {
        match (module_index, lesson_index) {
            (None, None) => {
                self.active_module = None;
                self.active_lesson = None;
            }
            (Some(mi), None) => {
                self.module(mi)?;
                self.active_module = Some(mi);
                self.active_lesson = None;
            }
            (Some(mi), Some(li)) => {
                self.lesson(mi, li)?;
                self.active_module = Some(mi);
                self.active_lesson = Some(LessonPointer {
                    module_index: mi,
                    lesson_index: li,
                });
            }
            (None, Some(_)) => {
                return Err(DomainError::Validation(
                    "lessonIndex requires moduleIndex".into(),
                ))
            }
        }
        Ok(())
    }

    /// Applies one drag result. Returns `false` when the drop was onto the item's own
    /// position, in which case nothing changes.
    pub fn reorder(&mut self, req: &ReorderRequest) -> DomainResult<bool> {
        match req.kind {
            ReorderKind::Module => self.reorder_module(req.source_index, req.dest_index),
            ReorderKind::Lesson => self.reorder_lesson(req),
        }
    }

    fn reorder_module(&mut self, source: usize, dest: usize) -> DomainResult<bool> {
        self.module(source)?;
        if source == dest {
            return Ok(false);
        }
        if dest >= self.modules.len() {
            return Err(DomainError::InvalidIndex {
                what: "destination module",
                index: dest,
            });
        }
        let selection = self.selection_ids();
        let mut modules = self.modules.clone();
        let moved = modules.remove(source);
        modules.insert(dest, moved);
        self.modules = modules;
        self.restore_selection(selection);
        Ok(true)
    }

    fn reorder_lesson(&mut self, req: &ReorderRequest) -> DomainResult<bool> {
        let source_parent = req
            .source_parent
            .as_deref()
            .ok_or_else(|| DomainError::Validation("lesson moves need a source module".into()))?;
        let dest_parent = req.dest_parent.as_deref().unwrap_or(source_parent);
        let src_mi = self.module_position(source_parent)?;
        let dst_mi = self.module_position(dest_parent)?;
        self.lesson(src_mi, req.source_index)?;

        if src_mi == dst_mi && req.source_index == req.dest_index {
            return Ok(false);
        }

        let selection = self.selection_ids();
        let mut modules = self.modules.clone();
        let moved = modules[src_mi].lessons.remove(req.source_index);
        if req.dest_index > modules[dst_mi].lessons.len() {
            return Err(DomainError::InvalidIndex {
                what: "destination lesson",
                index: req.dest_index,
            });
        }
        modules[dst_mi].lessons.insert(req.dest_index, moved);
        self.modules = modules;
        self.restore_selection(selection);
        Ok(true)
    }

    /// Body of the lesson at the given position, checked to contain `span`.
    pub fn lesson_span(&self, module_index: usize, lesson_index: usize, span: &str) -> DomainResult<&str> {
        if span.is_empty() {
            return Err(DomainError::Validation("selection is empty".into()));
        }
        let body = self
            .lesson(module_index, lesson_index)?
            .content
            .as_deref()
            .unwrap_or_default();
        if !body.contains(span) {
            return Err(DomainError::Validation(
                "selection not found in lesson content".into(),
            ));
        }
        Ok(body)
    }

    /// Swaps the first occurrence of `span` in a lesson body for `replacement`.
    pub fn replace_lesson_span(
        &mut self,
        module_index: usize,
        lesson_index: usize,
        span: &str,
        replacement: &str,
    ) -> DomainResult<()> {
        let updated = self
            .lesson_span(module_index, lesson_index, span)?
            .replacen(span, replacement, 1);
        self.lesson_mut(module_index, lesson_index)?.content = Some(updated);
        Ok(())
    }

    /// Builds the course this draft publishes. Edits keep the stored course's rating,
    /// enrollment count, reviews, owner and duration.
    pub fn build_course(&self, catalog: &Catalog, author: &User) -> DomainResult<Course> {
        if self.step != WizardStep::Content {
            return Err(DomainError::WizardGuard {
                step: self.step.label(),
                reason: "finish the remaining steps before publishing".into(),
            });
        }
        self.require_title(WizardStep::Content)?;

        let prior = self
            .editing_course_id
            .as_deref()
            .and_then(|id| catalog.course(id));
        let id = self
            .editing_course_id
            .clone()
            .unwrap_or_else(|| new_id("c"));
        let thumbnail = if self.thumbnail.trim().is_empty() {
            placeholder_thumbnail(&uuid::Uuid::new_v4().simple().to_string())
        } else {
            self.thumbnail.clone()
        };

        Ok(Course {
            id,
            title: self.title.clone(),
            description: self.description.clone(),
            instructor_id: prior
                .map(|p| p.instructor_id.clone())
                .unwrap_or_else(|| author.id.clone()),
            instructor_name: self.instructor_name.clone(),
            price: parse_price(&self.price),
            thumbnail,
            category: self.category.clone(),
            rating: prior.map_or(DEFAULT_COURSE_RATING, |p| p.rating),
            students_count: prior.map_or(0, |p| p.students_count),
            duration: prior
                .map(|p| p.duration.clone())
                .unwrap_or_else(|| NEW_COURSE_DURATION.to_string()),
            modules: self.modules.clone(),
            reviews: prior.map(|p| p.reviews.clone()).unwrap_or_default(),
        })
    }

    fn module(&self, index: usize) -> DomainResult<&Module> {
        self.modules.get(index).ok_or(DomainError::InvalidIndex {
            what: "module",
            index,
        })
    }

    fn module_mut(&mut self, index: usize) -> DomainResult<&mut Module> {
        self.modules.get_mut(index).ok_or(DomainError::InvalidIndex {
            what: "module",
            index,
        })
    }

    fn lesson(&self, module_index: usize, lesson_index: usize) -> DomainResult<&Lesson> {
        self.module(module_index)?
            .lessons
            .get(lesson_index)
            .ok_or(DomainError::InvalidIndex {
                what: "lesson",
                index: lesson_index,
            })
    }

    fn lesson_mut(&mut self, module_index: usize, lesson_index: usize) -> DomainResult<&mut Lesson> {
        self.module_mut(module_index)?
            .lessons
            .get_mut(lesson_index)
            .ok_or(DomainError::InvalidIndex {
                what: "lesson",
                index: lesson_index,
            })
    }

    fn module_position(&self, module_id: &str) -> DomainResult<usize> {
        self.modules
            .iter()
            .position(|m| m.id == module_id)
            .ok_or_else(|| DomainError::NotFound {
                kind: "module",
                id: module_id.to_string(),
            })
    }

    fn selection_ids(&self) -> (Option<String>, Option<String>) {
        let module_id = self
            .active_module
            .and_then(|i| self.modules.get(i))
            .map(|m| m.id.clone());
        let lesson_id = self
            .active_lesson
            .and_then(|p| self.lesson(p.module_index, p.lesson_index).ok())
            .map(|l| l.id.clone());
        (module_id, lesson_id)
    }

    // Pointers follow the selected items by id; a removed item clears its pointer.
    fn restore_selection(&mut self, (module_id, lesson_id): (Option<String>, Option<String>)) {
        self.active_module =
            module_id.and_then(|id| self.modules.iter().position(|m| m.id == id));
        self.active_lesson = lesson_id.and_then(|id| {
            self.modules.iter().enumerate().find_map(|(mi, m)| {
                m.lessons
                    .iter()
                    .position(|l| l.id == id)
                    .map(|li| LessonPointer {
                        module_index: mi,
                        lesson_index: li,
                    })
            })
        });
    }
}

/// Free-text price; anything unparseable, negative or non-finite is 0.
pub fn parse_price(raw: &str) -> f64 {
    let t = raw.trim().trim_start_matches('$').trim();
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

/// Turns an accepted outline into a full course with placeholder lesson bodies.
/// `stamp` makes the generated ids unique per acceptance.
pub fn expand_outline(outline: &CourseOutline, author: &User, stamp: &str) -> DomainResult<Course> {
    if outline.title.trim().is_empty() {
        return Err(DomainError::Validation("outline has no title".into()));
    }
    let modules = outline
        .modules
        .iter()
        .enumerate()
        .map(|(idx, m)| Module {
            id: format!("m-ai-{idx}-{stamp}"),
            title: m.title.clone(),
            lessons: m
                .lessons
                .iter()
                .enumerate()
                .map(|(lidx, l)| Lesson {
                    id: format!("l-ai-{idx}-{lidx}-{stamp}"),
                    title: l.clone(),
                    duration: AI_LESSON_DURATION.to_string(),
                    video_url: None,
                    content: Some(format!(
                        "<p>Auto-generated draft for <strong>{l}</strong>. Edit this content to provide more details.</p>"
                    )),
                })
                .collect(),
        })
        .collect();

    Ok(Course {
        id: format!("c-ai-{stamp}"),
        title: outline.title.clone(),
        description: outline.description.clone(),
        instructor_id: author.id.clone(),
        instructor_name: author.name.clone(),
        price: AI_COURSE_PRICE,
        thumbnail: placeholder_thumbnail(stamp),
        category: AI_COURSE_CATEGORY.to_string(),
        rating: DEFAULT_COURSE_RATING,
        students_count: 0,
        duration: AI_COURSE_DURATION.to_string(),
        modules,
        reviews: Vec::new(),
    })
}
