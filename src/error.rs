//! Domain-level failures and their stable wire codes.

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("not allowed: {0}")]
    Forbidden(String),

    #[error("sign in first")]
    NotSignedIn,

    #[error("no course draft is open")]
    NoDraft,

    #[error("cannot leave {step}: {reason}")]
    WizardGuard { step: &'static str, reason: String },

    #[error("index out of range: {what} {index}")]
    InvalidIndex { what: &'static str, index: usize },

    #[error("course already completed: {course_id}")]
    AlreadyCompleted { course_id: String },

    #[error("complete the course before reviewing it")]
    NotEligible,

    #[error("this course already has your review")]
    DuplicateReview,

    #[error("invalid import: {0}")]
    InvalidImport(String),

    #[error("confirmation required to {0}")]
    ConfirmationRequired(String),
}

impl DomainError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::NotFound { .. } => "not_found",
            Self::Forbidden(_) => "forbidden",
            Self::NotSignedIn => "not_signed_in",
            Self::NoDraft => "no_draft",
            Self::WizardGuard { .. } => "wizard_guard",
            Self::InvalidIndex { .. } => "invalid_index",
            Self::AlreadyCompleted { .. } => "already_completed",
            Self::NotEligible => "not_eligible",
            Self::DuplicateReview => "duplicate_review",
            Self::InvalidImport(_) => "invalid_import",
            Self::ConfirmationRequired(_) => "confirmation_required",
        }
    }

    pub fn course_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "course",
            id: id.to_string(),
        }
    }

    pub fn user_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "user",
            id: id.to_string(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
