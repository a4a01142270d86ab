use chrono::{DateTime, Utc};

use super::errors::DomainError;

pub const MAX_COMMENT_CHARS: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewView {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub rating: i32,
    pub comment: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ReviewInput {
    pub rating: i32,
    pub comment: String,
}

impl ReviewInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(1..=5).contains(&self.rating) {
            return Err(DomainError::invalid("rating must be between 1 and 5"));
        }
        if self.comment.chars().count() > MAX_COMMENT_CHARS {
            return Err(DomainError::invalid(format!(
                "comment must be at most {MAX_COMMENT_CHARS} characters"
            )));
        }
        Ok(())
    }
}
