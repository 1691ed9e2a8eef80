//! Database service for finance-service.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

use crate::chart::ScopePredicate;
use crate::error::AppError;
use crate::models::FeeRecord;
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::store::{FeeRecordStore, ParentDirectory};

const FEE_COLUMNS: &str =
    "fee_id, student_id, amount, paid_amount, status, due_date, paid_date, academic_year";

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "finance-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl FeeRecordStore for Database {
    /// Fetch all fee records for an academic year, narrowed by scope.
    #[instrument(skip(self, scope), fields(academic_year = %academic_year))]
    async fn fees_for_year(
        &self,
        academic_year: &str,
        scope: &ScopePredicate,
    ) -> Result<Vec<FeeRecord>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["fees_for_year"])
            .start_timer();

        let fees = match scope {
            ScopePredicate::Global => {
                sqlx::query_as::<_, FeeRecord>(&format!(
                    "SELECT {FEE_COLUMNS} FROM fees WHERE academic_year = $1"
                ))
                .bind(academic_year)
                .fetch_all(&self.pool)
                .await
            }
            ScopePredicate::SingleStudent(student_id) => {
                sqlx::query_as::<_, FeeRecord>(&format!(
                    "SELECT {FEE_COLUMNS} FROM fees WHERE academic_year = $1 AND student_id = $2"
                ))
                .bind(academic_year)
                .bind(student_id)
                .fetch_all(&self.pool)
                .await
            }
            ScopePredicate::StudentSet(student_ids) => {
                sqlx::query_as::<_, FeeRecord>(&format!(
                    "SELECT {FEE_COLUMNS} FROM fees WHERE academic_year = $1 AND student_id = ANY($2)"
                ))
                .bind(academic_year)
                .bind(student_ids)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to fetch fees: {}", e)))?;

        timer.observe_duration();

        Ok(fees)
    }
}

#[async_trait]
impl ParentDirectory for Database {
    /// Look up the student ids linked to a parent.
    #[instrument(skip(self), fields(parent_id = %parent_id))]
    async fn children_of(&self, parent_id: &str) -> Result<Vec<String>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["children_of"])
            .start_timer();

        let children: Vec<String> =
            sqlx::query_scalar("SELECT student_id FROM students WHERE parent_id = $1")
                .bind(parent_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to fetch children: {}", e))
                })?;

        timer.observe_duration();

        Ok(children)
    }
}
