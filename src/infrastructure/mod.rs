pub mod cart_repo;
pub mod catalogue_repo;
pub mod models;
pub mod order_repo;
pub mod stats_repo;
pub mod user_repo;

#[cfg(test)]
pub(crate) mod test_db;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::errors::DomainError;

pub use cart_repo::DieselCartRepository;
pub use catalogue_repo::DieselCatalogueRepository;
pub use order_repo::DieselOrderRepository;
pub use stats_repo::DieselStatsRepository;
pub use user_repo::DieselUserRepository;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                DomainError::Conflict(format!("duplicate value: {}", info.message()))
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                DomainError::Conflict("record is referenced by or refers to a missing row".to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
                DomainError::InvalidInput(info.message().to_string())
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

/// Rewrites foreign-key failures into a message the caller can act on.
pub(crate) fn foreign_key_as(message: &'static str) -> impl Fn(DieselError) -> DomainError {
    move |e| match e {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            DomainError::Conflict(message.to_string())
        }
        other => other.into(),
    }
}
