pub mod connection;
pub mod repositories;
pub mod schema;

pub use connection::{Database, DbPool};

/// True when the error chain bottoms out in a SQLite constraint violation
/// (duplicate key, unique index, CHECK). The constraint is the authoritative
/// guard against races; callers translate this to a Conflict outcome.
pub fn is_constraint_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
