//! Errors surfaced by the entity layer.
//!
//! Validation failures are mutually exclusive: a validator stops at the first
//! one and nothing is persisted. Store failures keep the underlying `DbErr`.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("{entity} org_id is mandatory")]
    MissingTenant { entity: &'static str },

    #[error("group name cannot be empty")]
    NameEmpty,

    #[error("group type must be one of: {allowed}")]
    TypeInvalid { allowed: String },

    #[error("group name contains characters that are not allowed")]
    NameInvalid,

    #[error("group account cannot be empty")]
    AccountEmpty,

    #[error("{entity} already exists: {key}")]
    UniquenessConflict { entity: &'static str, key: String },

    #[error("failed to remove members of device group {group_id}: {source}")]
    CascadeFailure {
        group_id: i32,
        #[source]
        source: DbErr,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} belongs to org {found}, expected {expected}")]
    TenantMismatch {
        entity: &'static str,
        expected: String,
        found: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl FleetError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Maps a unique-index violation onto `UniquenessConflict`, anything else
    /// stays a database error.
    pub fn classify(err: DbErr, entity: &'static str, key: impl Into<String>) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::UniquenessConflict {
                entity,
                key: key.into(),
            },
            _ => Self::Database(err),
        }
    }
}

pub type FleetResult<T> = Result<T, FleetError>;
