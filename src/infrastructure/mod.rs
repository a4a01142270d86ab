pub mod cart_repo;
pub mod models;
pub mod order_repo;
pub mod product_repo;
pub mod review_repo;
pub mod user_repo;

#[cfg(test)]
pub(crate) mod test_support;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::errors::DomainError;

pub use cart_repo::DieselCartRepository;
pub use order_repo::DieselOrderRepository;
pub use product_repo::DieselProductRepository;
pub use review_repo::DieselReviewRepository;
pub use user_repo::DieselUserRepository;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            | DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                DomainError::Conflict(info.message().to_string())
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

pub(crate) fn is_foreign_key_violation(e: &DieselError) -> bool {
    matches!(
        e,
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)
    )
}

pub(crate) fn is_check_violation(e: &DieselError) -> bool {
    matches!(e, DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _))
}

pub(crate) fn is_unique_violation(e: &DieselError) -> bool {
    matches!(e, DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
}

/// Clamps 1-based pagination input and returns `(limit, offset)`.
pub(crate) fn page_bounds(page: i64, limit: i64) -> (i64, i64) {
    let page = page.max(1);
    let limit = limit.clamp(1, 100);
    (limit, (page - 1).saturating_mul(limit))
}
