use crate::error::{DomainError, DomainResult};
use crate::model::{
    new_id, placeholder_avatar, round_one_decimal, Course, User, UserRole,
};
use crate::seed;
use serde::Serialize;

/// Authoritative course and user lists. All mutation goes through the methods here.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    users: Vec<User>,
}

#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub category: Option<String>,
    pub query: Option<String>,
    pub instructor_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorSummary {
    pub instructor_id: String,
    pub course_count: usize,
    pub total_students: u64,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct OnboardRequest {
    pub name: String,
    pub email: String,
    pub bio: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

impl Catalog {
    pub fn new(courses: Vec<Course>, users: Vec<User>) -> Self {
        Self { courses, users }
    }

    pub fn seeded() -> Self {
        Self::new(seed::demo_courses(), seed::demo_users())
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn course_mut(&mut self, id: &str) -> Option<&mut Course> {
        self.courses.iter_mut().find(|c| c.id == id)
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        let email = email.trim();
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    /// New ids go to the front of the list; known ids are replaced in place.
    pub fn add_or_replace_course(&mut self, course: Course) -> UpsertOutcome {
        match self.courses.iter_mut().find(|c| c.id == course.id) {
            Some(existing) => {
                *existing = course;
                UpsertOutcome::Replaced
            }
            None => {
                self.courses.insert(0, course);
                UpsertOutcome::Inserted
            }
        }
    }

    /// Upsert by id. Existing entries keep their position; unseen ids are appended in
    /// document order. A later duplicate id in `incoming` wins.
    pub fn import_courses(&mut self, incoming: Vec<Course>) -> (usize, usize) {
        let mut inserted = 0;
        let mut replaced = 0;
        for course in incoming {
            match self.courses.iter_mut().find(|c| c.id == course.id) {
                Some(existing) => {
                    *existing = course;
                    replaced += 1;
                }
                None => {
                    self.courses.push(course);
                    inserted += 1;
                }
            }
        }
        (inserted, replaced)
    }

    /// Reviews and certificates that point at the course are left alone.
    pub fn delete_course(&mut self, id: &str) -> DomainResult<Course> {
        let pos = self
            .courses
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| DomainError::course_not_found(id))?;
        Ok(self.courses.remove(pos))
    }

    pub fn list_courses(&self, filter: &CourseFilter) -> Vec<&Course> {
        let category = filter
            .category
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"));
        let query = filter
            .query
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());
        self.courses
            .iter()
            .filter(|c| category.map_or(true, |cat| c.category.eq_ignore_ascii_case(cat)))
            .filter(|c| {
                filter
                    .instructor_id
                    .as_deref()
                    .map_or(true, |iid| c.instructor_id == iid)
            })
            .filter(|c| {
                query.as_deref().map_or(true, |q| {
                    c.title.to_lowercase().contains(q) || c.description.to_lowercase().contains(q)
                })
            })
            .collect()
    }

    /// Admins export everything, instructors their own courses, everyone else nothing.
    pub fn courses_for_export(&self, user: &User) -> Vec<Course> {
        match user.role {
            UserRole::Admin => self.courses.clone(),
            UserRole::Instructor => self
                .courses
                .iter()
                .filter(|c| c.instructor_id == user.id)
                .cloned()
                .collect(),
            UserRole::Student | UserRole::Guest => Vec::new(),
        }
    }

    pub fn add_user(&mut self, user: User) -> DomainResult<()> {
        if self.user(&user.id).is_some() {
            return Err(DomainError::Validation(format!(
                "user id already exists: {}",
                user.id
            )));
        }
        self.users.push(user);
        Ok(())
    }

    /// Replaces the stored copy of a user, or appends it when the id is unknown
    /// (a restored session for a user created in an earlier run).
    pub fn upsert_user(&mut self, user: &User) {
        match self.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => self.users.push(user.clone()),
        }
    }

    pub fn onboard_instructor(&mut self, req: OnboardRequest) -> DomainResult<User> {
        let id = new_id("u");
        let name = non_blank(req.name).unwrap_or_else(|| "New Instructor".to_string());
        let avatar = non_blank(req.avatar).unwrap_or_else(|| placeholder_avatar(&id));
        let user = User {
            id: id.clone(),
            name,
            email: req.email.trim().to_string(),
            role: UserRole::Instructor,
            avatar,
            bio: Some(req.bio.trim().to_string()),
            is_verified: Some(false),
            completed_course_ids: Vec::new(),
            enrolled_course_ids: Vec::new(),
            completed_lesson_ids: Vec::new(),
        };
        self.add_user(user.clone())?;
        Ok(user)
    }

    pub fn set_user_verified(&mut self, id: &str, verified: bool) -> DomainResult<&User> {
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| DomainError::user_not_found(id))?;
        user.is_verified = Some(verified);
        Ok(user)
    }

    pub fn toggle_user_verified(&mut self, id: &str) -> DomainResult<&User> {
        let current = self
            .user(id)
            .ok_or_else(|| DomainError::user_not_found(id))?
            .is_verified
            .unwrap_or(false);
        self.set_user_verified(id, !current)
    }

    pub fn instructor_summary(&self, instructor_id: &str) -> DomainResult<InstructorSummary> {
        if self.user(instructor_id).is_none() {
            return Err(DomainError::user_not_found(instructor_id));
        }
        let owned: Vec<&Course> = self
            .courses
            .iter()
            .filter(|c| c.instructor_id == instructor_id)
            .collect();
        let total_students = owned.iter().map(|c| c.students_count).sum();
        let average_rating = if owned.is_empty() {
            None
        } else {
            let sum: f64 = owned.iter().map(|c| c.rating).sum();
            Some(round_one_decimal(sum / owned.len() as f64))
        };
        Ok(InstructorSummary {
            instructor_id: instructor_id.to_string(),
            course_count: owned.len(),
            total_students,
            average_rating,
        })
    }
}

fn non_blank(s: String) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}
