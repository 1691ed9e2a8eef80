//! Finance chart endpoint.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use crate::chart::{ChartRequest, MonthBucket};
use crate::error::AppError;
use crate::middleware::AuthContext;
use crate::services::metrics::CHART_REQUESTS_TOTAL;
use crate::AppState;

/// Query parameters, camelCase as the dashboard sends them.
#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    #[serde(rename = "academicYear")]
    pub academic_year: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Monthly collected/pending/overdue chart for one academic year.
///
/// Responds 200 with exactly twelve buckets for every authenticated
/// request; bad year labels, empty scopes, and upstream failures all come
/// back as the all-zero report. Only a missing caller identity is an error.
pub async fn monthly_chart(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ChartQuery>,
) -> Result<Json<Vec<MonthBucket>>, AppError> {
    let request = ChartRequest {
        caller_id: auth.user_id,
        caller_role: auth.role,
        academic_year: query.academic_year,
        requested_role: query.role,
        requested_user_id: query.user_id,
    };

    let today = Utc::now().date_naive();
    let outcome = state.engine.monthly_chart(&request, today).await;

    if let Some(diagnostic) = &outcome.diagnostic {
        warn!(?diagnostic, "Chart degraded to empty report");
        CHART_REQUESTS_TOTAL.with_label_values(&["degraded"]).inc();
    } else {
        CHART_REQUESTS_TOTAL.with_label_values(&["ok"]).inc();
    }

    Ok(Json(outcome.report))
}
