//! # ヘルスチェックハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /health` - liveness。プロセスが応答できれば常に 200
//! - `GET /health/ready` - readiness。DB に `SELECT 1` が通れば 200、失敗で 503

use std::{sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use employees_infra::repository::EmployeeRepository;
use employees_shared::{CheckStatus, HealthResponse, ReadinessResponse};

/// DB 疎通確認のタイムアウト
const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

/// Readiness Check 用の State
pub struct ReadinessState {
    pub repository: Arc<dyn EmployeeRepository>,
}

/// ヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

/// Readiness Check エンドポイント
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let database = check_database(state.repository.as_ref()).await;
    let response = ReadinessResponse::from_checks([("database", database)]);

    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

async fn check_database(repository: &dyn EmployeeRepository) -> CheckStatus {
    match tokio::time::timeout(READINESS_TIMEOUT, repository.ping()).await {
        Ok(Ok(())) => CheckStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, failure = ?e.failure(), "readiness check: database ping failed");
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!("readiness check: database check timed out");
            CheckStatus::Error
        }
    }
}
