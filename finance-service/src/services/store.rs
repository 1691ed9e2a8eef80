//! Collaborator seams consumed by the chart engine.

use async_trait::async_trait;

use crate::chart::ScopePredicate;
use crate::error::AppError;
use crate::models::FeeRecord;

/// Queryable source of fee records. The engine issues exactly one query
/// per request, combining the academic-year label with the caller's scope.
#[async_trait]
pub trait FeeRecordStore: Send + Sync {
    async fn fees_for_year(
        &self,
        academic_year: &str,
        scope: &ScopePredicate,
    ) -> Result<Vec<FeeRecord>, AppError>;
}

/// Parent-to-children lookup, the one indirect join the engine needs.
#[async_trait]
pub trait ParentDirectory: Send + Sync {
    async fn children_of(&self, parent_id: &str) -> Result<Vec<String>, AppError>;
}
