//! Router-level tests for the finance chart endpoint, driven through
//! in-memory collaborators.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use tower::util::ServiceExt;
use uuid::Uuid;

use finance_service::build_router;
use finance_service::chart::{FinanceEngine, ScopePredicate};
use finance_service::error::AppError;
use finance_service::models::FeeRecord;
use finance_service::services::{FeeRecordStore, ParentDirectory};
use finance_service::AppState;

struct FakeStore {
    fees: Vec<FeeRecord>,
    fail: bool,
}

#[async_trait]
impl FeeRecordStore for FakeStore {
    async fn fees_for_year(
        &self,
        academic_year: &str,
        scope: &ScopePredicate,
    ) -> Result<Vec<FeeRecord>, AppError> {
        if self.fail {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "connection refused"
            )));
        }
        Ok(self
            .fees
            .iter()
            .filter(|fee| fee.academic_year == academic_year)
            .filter(|fee| match scope {
                ScopePredicate::Global => true,
                ScopePredicate::SingleStudent(id) => &fee.student_id == id,
                ScopePredicate::StudentSet(ids) => ids.contains(&fee.student_id),
            })
            .cloned()
            .collect())
    }
}

struct FakeDirectory {
    children: Vec<String>,
}

#[async_trait]
impl ParentDirectory for FakeDirectory {
    async fn children_of(&self, _parent_id: &str) -> Result<Vec<String>, AppError> {
        Ok(self.children.clone())
    }
}

fn fee(student: &str, amount: i64, paid: i64, status: &str, due: &str, paid_date: Option<&str>) -> FeeRecord {
    FeeRecord {
        fee_id: Uuid::new_v4(),
        student_id: student.to_string(),
        amount: Decimal::new(amount, 0),
        paid_amount: Decimal::new(paid, 0),
        status: status.to_string(),
        due_date: Some(due.to_string()),
        paid_date: paid_date.map(String::from),
        academic_year: "2024-2025".to_string(),
    }
}

fn app(fees: Vec<FeeRecord>, fail: bool, children: Vec<String>) -> axum::Router {
    let engine = FinanceEngine::new(
        Arc::new(FakeStore { fees, fail }),
        Arc::new(FakeDirectory { children }),
    );
    build_router(AppState::new(engine))
}

async fn get_chart(app: axum::Router, uri: &str, role: Option<&str>) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().uri(uri).header("X-User-ID", "admin-1");
    if let Some(role) = role {
        builder = builder.header("X-User-Role", role);
    }
    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn month<'a>(body: &'a serde_json::Value, name: &str) -> &'a serde_json::Value {
    body.as_array()
        .unwrap()
        .iter()
        .find(|b| b["name"] == name)
        .unwrap()
}

fn assert_all_zero(body: &serde_json::Value) {
    let buckets = body.as_array().unwrap();
    assert_eq!(buckets.len(), 12);
    for bucket in buckets {
        assert_eq!(bucket["collected"], 0);
        assert_eq!(bucket["pending"], 0);
        assert_eq!(bucket["overdue"], 0);
        assert_eq!(bucket["total"], 0);
    }
}

#[tokio::test]
async fn missing_identity_header_is_unauthorized() {
    let app = app(vec![], false, vec![]);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/finance/chart")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    // Error shape, not the data array.
    assert!(body.get("error").is_some());
    assert!(body.as_array().is_none());
}

#[tokio::test]
async fn buckets_are_in_academic_order() {
    let app = app(vec![], false, vec![]);
    let (status, body) = get_chart(app, "/finance/chart?academicYear=2024-2025", Some("admin")).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["Jul", "Aug", "Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar", "Apr", "May", "Jun"]
    );
}

#[tokio::test]
async fn paid_fee_shows_as_collected_in_its_due_month() {
    let fees = vec![fee("s1", 100, 100, "paid", "2024-09-15", None)];
    let app = app(fees, false, vec![]);
    let (status, body) = get_chart(app, "/finance/chart?academicYear=2024-2025", Some("admin")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(month(&body, "Sep")["collected"], 100);
    assert_eq!(month(&body, "Sep")["total"], 100);
    assert_eq!(month(&body, "Oct")["collected"], 0);
}

#[tokio::test]
async fn fee_paid_in_a_later_month_appears_in_both() {
    let fees = vec![fee(
        "s1",
        100,
        100,
        "paid",
        "2024-10-01",
        Some("2024-11-12"),
    )];
    let app = app(fees, false, vec![]);
    let (_, body) = get_chart(app, "/finance/chart?academicYear=2024-2025", Some("admin")).await;

    assert_eq!(month(&body, "Oct")["collected"], 100);
    assert_eq!(month(&body, "Nov")["collected"], 100);
}

#[tokio::test]
async fn overdue_fee_with_partial_payment_fills_two_columns() {
    // Due long in the past relative to any plausible "today".
    let fees = vec![fee("s1", 200, 50, "pending", "2024-09-15", None)];
    let app = app(fees, false, vec![]);
    let (_, body) = get_chart(app, "/finance/chart?academicYear=2024-2025", Some("admin")).await;

    let sep = month(&body, "Sep");
    assert_eq!(sep["overdue"], 150);
    assert_eq!(sep["collected"], 50);
    assert_eq!(sep["total"], 200);
}

#[tokio::test]
async fn every_bucket_total_is_the_column_sum() {
    let fees = vec![
        fee("s1", 100, 100, "paid", "2024-09-15", None),
        fee("s2", 200, 50, "pending", "2024-09-20", None),
        fee("s3", 75, 0, "pending", "2025-02-10", None),
    ];
    let app = app(fees, false, vec![]);
    let (_, body) = get_chart(app, "/finance/chart?academicYear=2024-2025", Some("admin")).await;

    for bucket in body.as_array().unwrap() {
        let sum = bucket["collected"].as_i64().unwrap()
            + bucket["pending"].as_i64().unwrap()
            + bucket["overdue"].as_i64().unwrap();
        assert_eq!(bucket["total"].as_i64().unwrap(), sum);
    }
}

#[tokio::test]
async fn malformed_year_returns_all_zero_buckets_with_ok_status() {
    let fees = vec![fee("s1", 100, 100, "paid", "2024-09-15", None)];
    let app = app(fees, false, vec![]);
    let (status, body) = get_chart(app, "/finance/chart?academicYear=2024", Some("admin")).await;

    assert_eq!(status, StatusCode::OK);
    assert_all_zero(&body);
}

#[tokio::test]
async fn store_failure_returns_all_zero_buckets_with_ok_status() {
    let app = app(vec![], true, vec![]);
    let (status, body) = get_chart(app, "/finance/chart?academicYear=2024-2025", Some("admin")).await;

    assert_eq!(status, StatusCode::OK);
    assert_all_zero(&body);
}

#[tokio::test]
async fn parent_with_no_children_gets_the_empty_report() {
    let fees = vec![fee("s1", 100, 100, "paid", "2024-09-15", None)];
    let app = app(fees, false, vec![]);
    let (status, body) = get_chart(app, "/finance/chart?academicYear=2024-2025", Some("parent")).await;

    assert_eq!(status, StatusCode::OK);
    assert_all_zero(&body);
}

#[tokio::test]
async fn parent_sees_the_union_of_their_children() {
    let fees = vec![
        fee("child-a", 100, 100, "paid", "2024-09-15", None),
        fee("child-b", 70, 70, "paid", "2024-10-03", None),
        fee("someone-else", 500, 500, "paid", "2024-09-15", None),
    ];
    let app = app(
        fees,
        false,
        vec!["child-a".to_string(), "child-b".to_string()],
    );
    let (_, body) = get_chart(app, "/finance/chart?academicYear=2024-2025", Some("parent")).await;

    assert_eq!(month(&body, "Sep")["collected"], 100);
    assert_eq!(month(&body, "Oct")["collected"], 70);
}

#[tokio::test]
async fn explicit_role_and_user_override_the_session() {
    let fees = vec![
        fee("student-7", 100, 100, "paid", "2024-09-15", None),
        fee("student-8", 40, 40, "paid", "2024-09-15", None),
    ];
    let app = app(fees, false, vec![]);
    let (_, body) = get_chart(
        app,
        "/finance/chart?academicYear=2024-2025&role=student&userId=student-7",
        Some("admin"),
    )
    .await;

    assert_eq!(month(&body, "Sep")["collected"], 100);
}

#[tokio::test]
async fn empty_role_param_does_not_widen_a_student_session() {
    let fees = vec![
        fee("s1", 100, 100, "paid", "2024-09-15", None),
        fee("s2", 200, 200, "paid", "2024-09-15", None),
        fee("s3", 300, 300, "paid", "2024-09-15", None),
    ];
    let app = app(fees, false, vec![]);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/finance/chart?academicYear=2024-2025&role=")
                .header("X-User-ID", "s1")
                .header("X-User-Role", "student")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    // Own fees only, not the whole school's.
    assert_eq!(month(&body, "Sep")["collected"], 100);
}

#[tokio::test]
async fn empty_user_id_param_falls_back_to_the_session_user() {
    let fees = vec![
        fee("s1", 100, 100, "paid", "2024-09-15", None),
        fee("s2", 200, 200, "paid", "2024-09-15", None),
    ];
    let app = app(fees, false, vec![]);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/finance/chart?academicYear=2024-2025&userId=")
                .header("X-User-ID", "s1")
                .header("X-User-Role", "student")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(month(&body, "Sep")["collected"], 100);
}

#[tokio::test]
async fn fee_with_unparseable_due_date_is_skipped() {
    let fees = vec![
        fee("s1", 100, 100, "paid", "soon", None),
        fee("s2", 40, 40, "paid", "2024-09-15", None),
    ];
    let app = app(fees, false, vec![]);
    let (status, body) = get_chart(app, "/finance/chart?academicYear=2024-2025", Some("admin")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(month(&body, "Sep")["collected"], 40);
}

#[tokio::test]
async fn health_check_works() {
    let app = app(vec![], false, vec![]);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
