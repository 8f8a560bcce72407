//! Course completion, certificate issuance and lookup.

use crate::catalog::Catalog;
use crate::error::{DomainError, DomainResult};
use crate::model::{Certificate, Course, User};
use chrono::{DateTime, Datelike, Local};
use serde::Serialize;

pub const ROLL_PREFIX: &str = "EP";
const ROLL_SUFFIX_LEN: usize = 6;
const ROLL_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Issued certificates, oldest first.
#[derive(Debug, Clone, Default)]
pub struct CertificateRegistry {
    certificates: Vec<Certificate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verification {
    Found { certificate: Certificate },
    NotFound,
}

impl CertificateRegistry {
    pub fn new(certificates: Vec<Certificate>) -> Self {
        Self { certificates }
    }

    pub fn all(&self) -> &[Certificate] {
        &self.certificates
    }

    pub fn for_student<'a>(&'a self, student_id: &'a str) -> impl Iterator<Item = &'a Certificate> {
        self.certificates
            .iter()
            .filter(move |c| c.student_id == student_id)
    }

    pub fn find(&self, course_id: &str, student_id: &str) -> Option<&Certificate> {
        self.certificates
            .iter()
            .find(|c| c.course_id == course_id && c.student_id == student_id)
    }

    pub fn verify(&self, roll_number: &str) -> DomainResult<Verification> {
        let wanted = roll_number.trim();
        if wanted.is_empty() {
            return Err(DomainError::Validation("roll number is empty".into()));
        }
        Ok(self
            .certificates
            .iter()
            .find(|c| c.roll_number.eq_ignore_ascii_case(wanted))
            .map(|c| Verification::Found {
                certificate: c.clone(),
            })
            .unwrap_or(Verification::NotFound))
    }

    fn contains_roll(&self, roll: &str) -> bool {
        self.certificates
            .iter()
            .any(|c| c.roll_number.eq_ignore_ascii_case(roll))
    }

    /// Draws roll numbers until one is not already issued.
    pub fn fresh_roll_number(&self, now: &DateTime<Local>) -> String {
        loop {
            let candidate = generate_roll_number(now.year());
            if !self.contains_roll(&candidate) {
                return candidate;
            }
        }
    }

    /// Completes `course_id` for `user` and issues its certificate.
    ///
    /// Returns `Ok(None)` when there is no such course: that is a silent no-op.
    /// A course the user has already completed is rejected and nothing changes.
    pub fn complete_course(
        &mut self,
        catalog: &Catalog,
        user: &mut User,
        course_id: &str,
        now: DateTime<Local>,
    ) -> DomainResult<Option<Certificate>> {
        let Some(course) = catalog.course(course_id) else {
            return Ok(None);
        };
        if user.has_completed(course_id) {
            return Err(DomainError::AlreadyCompleted {
                course_id: course_id.to_string(),
            });
        }

        let certificate = self.certificate_for(course, user, &now);
        user.completed_course_ids.push(course_id.to_string());
        self.certificates.push(certificate.clone());
        Ok(Some(certificate))
    }

    fn certificate_for(&self, course: &Course, user: &User, now: &DateTime<Local>) -> Certificate {
        Certificate {
            roll_number: self.fresh_roll_number(now),
            course_id: course.id.clone(),
            course_title: course.title.clone(),
            student_id: user.id.clone(),
            student_name: user.name.clone(),
            completion_date: now.format("%B %-d, %Y").to_string(),
            instructor_name: course.instructor_name.clone(),
        }
    }
}

/// `EP-<year>-<6 uppercase alphanumerics>`, suffix drawn from the leading bytes of v4
/// uuids (bytes 6 and 8 carry version and variant bits).
pub fn generate_roll_number(year: i32) -> String {
    let mut suffix = String::with_capacity(ROLL_SUFFIX_LEN);
    while suffix.len() < ROLL_SUFFIX_LEN {
        let bytes = uuid::Uuid::new_v4().into_bytes();
        let need = ROLL_SUFFIX_LEN - suffix.len();
        suffix.extend(bytes[..6].iter().filter_map(|b| roll_char(*b)).take(need));
    }
    format!("{ROLL_PREFIX}-{year:04}-{suffix}")
}

// Bytes at or above the last whole multiple of 36 are skipped so every symbol is
// equally likely.
fn roll_char(byte: u8) -> Option<char> {
    let limit = 256 - 256 % ROLL_ALPHABET.len();
    let b = usize::from(byte);
    (b < limit).then(|| ROLL_ALPHABET[b % ROLL_ALPHABET.len()] as char)
}

/// Share of the course's lessons the user has finished, as a rounded percentage.
pub fn course_progress(user: &User, course: &Course) -> u8 {
    let total = course.lesson_count();
    if total == 0 {
        return if user.has_completed(&course.id) { 100 } else { 0 };
    }
    let done = course
        .lessons()
        .filter(|l| user.completed_lesson_ids.iter().any(|id| *id == l.id))
        .count();
    ((done as f64 / total as f64) * 100.0).round() as u8
}

/// Returns `true` when the enrollment is new.
pub fn enroll(user: &mut User, course_id: &str) -> bool {
    if user.is_enrolled(course_id) {
        return false;
    }
    user.enrolled_course_ids.push(course_id.to_string());
    true
}

pub fn complete_lesson(user: &mut User, lesson_id: &str) -> bool {
    if user.completed_lesson_ids.iter().any(|l| l == lesson_id) {
        return false;
    }
    user.completed_lesson_ids.push(lesson_id.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 3, 7, 10, 0, 0)
            .single()
            .expect("valid local time")
    }

    fn is_well_formed_roll(roll: &str, year: i32) -> bool {
        let mut parts = roll.split('-');
        let (Some(prefix), Some(y), Some(suffix), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        prefix == ROLL_PREFIX
            && y == format!("{year:04}")
            && suffix.len() == ROLL_SUFFIX_LEN
            && suffix
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
    }

    fn cert(roll: &str) -> Certificate {
        Certificate {
            roll_number: roll.into(),
            course_id: "c1".into(),
            course_title: "Advanced React Architecture".into(),
            student_id: "3".into(),
            student_name: "Alex Chen".into(),
            completion_date: "March 7, 2025".into(),
            instructor_name: "Sarah Johnson".into(),
        }
    }

    #[test]
    fn roll_numbers_have_expected_shape() {
        for _ in 0..200 {
            let r = generate_roll_number(2025);
            assert!(is_well_formed_roll(&r, 2025), "bad roll {r}");
        }
        assert!(!is_well_formed_roll("EP-2025-abc123", 2025));
        assert!(!is_well_formed_roll("EP-2024-ABC123", 2025));
        assert!(!is_well_formed_roll("EP-2025-ABC12", 2025));
    }

    #[test]
    fn roll_alphabet_mapping_is_unbiased() {
        let mut hits = [0usize; 36];
        for b in 0..=u8::MAX {
            if let Some(c) = roll_char(b) {
                let pos = ROLL_ALPHABET.iter().position(|a| *a as char == c).expect("symbol");
                hits[pos] += 1;
            }
        }
        assert!(hits.iter().all(|h| *h == 7), "{hits:?}");
        assert_eq!(roll_char(251), Some('Z'));
        assert_eq!(roll_char(252), None);
        assert_eq!(roll_char(255), None);
    }

    #[test]
    fn verify_ignores_case_and_reports_absence() {
        let reg = CertificateRegistry::new(vec![cert("EP-2025-ABC123")]);
        let lower = reg.verify("ep-2025-abc123").expect("verify");
        let upper = reg.verify("EP-2025-ABC123").expect("verify");
        assert_eq!(lower, upper);
        assert!(matches!(lower, Verification::Found { .. }));
        assert_eq!(reg.verify("EP-2025-ZZZZZZ").expect("verify"), Verification::NotFound);
        assert!(reg.verify("   ").is_err());
    }

    #[test]
    fn complete_issues_once_and_rejects_repeat() {
        let cat = Catalog::seeded();
        let mut user = cat.user("3").cloned().expect("student");
        let mut reg = CertificateRegistry::default();

        let issued = reg
            .complete_course(&cat, &mut user, "c1", fixed_now())
            .expect("complete")
            .expect("certificate");
        assert!(is_well_formed_roll(&issued.roll_number, 2025));
        assert_eq!(issued.completion_date, "March 7, 2025");
        assert_eq!(issued.instructor_name, "Sarah Johnson");
        assert!(user.has_completed("c1"));
        assert_eq!(reg.find("c1", "3"), Some(&issued));

        let again = reg.complete_course(&cat, &mut user, "c1", fixed_now());
        assert_eq!(again.unwrap_err().code(), "already_completed");
        assert_eq!(reg.all().len(), 1);
        assert_eq!(
            user.completed_course_ids.iter().filter(|c| *c == "c1").count(),
            1
        );
    }

    #[test]
    fn unknown_course_is_a_silent_noop() {
        let cat = Catalog::seeded();
        let mut user = cat.user("3").cloned().expect("student");
        let before = user.clone();
        let mut reg = CertificateRegistry::default();
        let out = reg
            .complete_course(&cat, &mut user, "missing", fixed_now())
            .expect("noop");
        assert!(out.is_none());
        assert_eq!(user, before);
        assert!(reg.all().is_empty());
    }

    #[test]
    fn completion_does_not_require_enrollment() {
        let cat = Catalog::seeded();
        let mut admin = cat.user("1").cloned().expect("admin");
        let mut reg = CertificateRegistry::default();
        let issued = reg
            .complete_course(&cat, &mut admin, "c3", fixed_now())
            .expect("complete");
        assert!(issued.is_some());
    }

    #[test]
    fn progress_counts_completed_lessons() {
        let cat = Catalog::seeded();
        let student = cat.user("3").cloned().expect("student");
        let c1 = cat.course("c1").expect("c1");
        assert_eq!(course_progress(&student, c1), 25);

        let mut empty = cat.course("c2").cloned().expect("c2");
        empty.modules.clear();
        assert_eq!(course_progress(&student, &empty), 100);
    }

    #[test]
    fn enroll_and_lesson_completion_are_idempotent() {
        let cat = Catalog::seeded();
        let mut user = cat.user("1").cloned().expect("admin");
        assert!(enroll(&mut user, "c1"));
        assert!(!enroll(&mut user, "c1"));
        assert!(complete_lesson(&mut user, "l1"));
        assert!(!complete_lesson(&mut user, "l1"));
        assert_eq!(user.enrolled_course_ids, vec!["c1".to_string()]);
    }
}
