use crate::catalog::Catalog;
use crate::error::{DomainError, DomainResult};
use crate::model::{new_id, round_one_decimal, Course, Review, User, DEFAULT_COURSE_RATING};
use chrono::NaiveDate;

/// Mean of the review ratings to one decimal; the seed rating when there are none.
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return DEFAULT_COURSE_RATING;
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    round_one_decimal(f64::from(sum) / reviews.len() as f64)
}

/// Adds `user`'s review to the front of the course's reviews and refreshes its rating.
///
/// Only users who completed the course may review it, once.
pub fn submit_review(
    catalog: &mut Catalog,
    user: &User,
    course_id: &str,
    rating: i64,
    comment: &str,
    today: NaiveDate,
) -> DomainResult<Course> {
    let rating = u8::try_from(rating)
        .ok()
        .filter(|r| (1..=5).contains(r))
        .ok_or_else(|| DomainError::Validation("rating must be between 1 and 5".into()))?;
    let comment = comment.trim();
    if comment.is_empty() {
        return Err(DomainError::Validation("comment must not be empty".into()));
    }

    let course = catalog
        .course_mut(course_id)
        .ok_or_else(|| DomainError::course_not_found(course_id))?;
    if !user.has_completed(course_id) {
        return Err(DomainError::NotEligible);
    }
    if course.reviews.iter().any(|r| r.user_id == user.id) {
        return Err(DomainError::DuplicateReview);
    }

    course.reviews.insert(
        0,
        Review {
            id: new_id("r"),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            user_avatar: user.avatar.clone(),
            rating,
            comment: comment.to_string(),
            date: today.format("%Y-%m-%d").to_string(),
        },
    );
    course.rating = average_rating(&course.reviews);
    Ok(course.clone())
}
