use serde::{Deserialize, Serialize};

pub const DEFAULT_COURSE_RATING: f64 = 5.0;
pub const DEFAULT_CATEGORY: &str = "Development";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    Instructor,
    Student,
    Guest,
}

impl UserRole {
    pub fn can_author(self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Instructor)
    }

    pub fn is_admin(self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(default)]
    pub completed_course_ids: Vec<String>,
    #[serde(default)]
    pub enrolled_course_ids: Vec<String>,
    #[serde(default)]
    pub completed_lesson_ids: Vec<String>,
}

impl User {
    pub fn has_completed(&self, course_id: &str) -> bool {
        self.completed_course_ids.iter().any(|c| c == course_id)
    }

    pub fn is_enrolled(&self, course_id: &str) -> bool {
        self.enrolled_course_ids.iter().any(|c| c == course_id)
    }

    /// Instructors may manage their own courses, admins any course.
    pub fn can_manage(&self, course: &Course) -> bool {
        self.role.is_admin() || (self.role.can_author() && course.instructor_id == self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub user_avatar: String,
    pub rating: u8,
    pub comment: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub roll_number: String,
    pub course_id: String,
    pub course_title: String,
    pub student_id: String,
    pub student_name: String,
    pub completion_date: String,
    pub instructor_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructor_id: String,
    #[serde(default)]
    pub instructor_name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_rating")]
    pub rating: f64,
    #[serde(default)]
    pub students_count: u64,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

fn default_rating() -> f64 {
    DEFAULT_COURSE_RATING
}

impl Course {
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(|m| m.lessons.iter())
    }

    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }
}

/// Rounds half away from zero to one decimal place.
pub fn round_one_decimal(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub fn placeholder_thumbnail(seed: &str) -> String {
    format!("https://picsum.photos/seed/{seed}/800/450")
}

pub fn placeholder_avatar(seed: &str) -> String {
    format!("https://picsum.photos/seed/{seed}/200")
}

pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_parses_with_missing_optional_fields() {
        let raw = serde_json::json!({ "id": "c9", "title": "Bare" });
        let c: Course = serde_json::from_value(raw).expect("parse course");
        assert_eq!(c.rating, DEFAULT_COURSE_RATING);
        assert!(c.modules.is_empty());
        assert!(c.reviews.is_empty());
    }

    #[test]
    fn role_serializes_uppercase() {
        let v = serde_json::to_value(UserRole::Instructor).expect("serialize");
        assert_eq!(v, serde_json::json!("INSTRUCTOR"));
    }

    #[test]
    fn round_one_decimal_goes_half_up() {
        assert_eq!(round_one_decimal(4.25), 4.3);
        assert_eq!(round_one_decimal(4.24), 4.2);
        assert_eq!(round_one_decimal(5.0), 5.0);
    }
}
