use shared_error::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

/// Initialize database connection pool
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, AppError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| AppError::server("server.internal.database", e))
}

/// Numeric keys for `pg_advisory_xact_lock`, one per startup-synchronization
/// routine so concurrent instances serialize without blocking each other's
/// unrelated work (spec §5).
pub mod advisory_lock {
    pub const PERMISSIONS_AND_ROLES: i64 = 0x4c50_4301; // "LPC" + 01
    pub const TENANTS: i64 = 0x4c50_4302;
    pub const FEATURE_FLAGS: i64 = 0x4c50_4303;
}

/// Acquire a transaction-scoped advisory lock. Released automatically when
/// `tx` commits or rolls back.
pub async fn acquire_advisory_lock(
    tx: &mut Transaction<'_, Postgres>,
    key: i64,
) -> Result<(), AppError> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(key)
        .execute(&mut **tx)
        .await
        .map_err(AppError::from)?;
    Ok(())
}
