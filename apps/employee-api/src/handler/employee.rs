//! # 従業員ハンドラ
//!
//! `employee` テーブルの CRUD API を提供する。
//!
//! ## エンドポイント
//!
//! - `GET /employees` - 全件取得
//! - `GET /employees/{id}` - 1 件取得
//! - `POST /employees` - 作成
//! - `PUT /employees/{id}` - 部分更新
//! - `DELETE /employees/{id}` - 削除
//!
//! ## リクエストボディ
//!
//! 作成・更新とも `{ "payload": { "name": ..., "salary": ... } }`。
//! 型の検証はドメイン層（[`NewEmployee`] / [`EmployeeChanges`]）で行う。
//!
//! `Content-Type: application/json` がないボディはフィールドを検証せず、
//! Content-Type を指摘する 422 を返す。JSON として読めない、または
//! `payload` がないボディは全フィールドの型不一致として 422 を返す。
//!
//! ## パスの ID
//!
//! 符号なし整数として解釈できない ID（パーセントデコード後に UTF-8 でないものを含む）は
//! 「一致する行がない」と同じ扱いにし、DB に問い合わせずに各操作の 404 を返す。

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path,
        State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
};
use employees_domain::{
    DomainError,
    FieldViolation,
    employee::{Employee, EmployeeChanges, EmployeeId, NewEmployee},
};
use employees_infra::repository::EmployeeRepository;
use employees_shared::{Acknowledgement, PayloadResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Missing};

/// 従業員 API の共有状態
pub struct EmployeeState {
    pub repository: Arc<dyn EmployeeRepository>,
}

// --- リクエスト/レスポンス型 ---

/// 作成・更新リクエスト
#[derive(Debug, Deserialize)]
pub struct EmployeeRequest {
    pub payload: Option<EmployeePayload>,
}

/// リクエストの `payload`
///
/// 型の検証をドメイン層で行うため、値は JSON のまま受け取る。
/// `null` と未指定はどちらも `None` になる。
#[derive(Debug, Default, Deserialize)]
pub struct EmployeePayload {
    pub name:   Option<Value>,
    pub salary: Option<Value>,
}

/// 従業員 DTO
#[derive(Debug, Serialize)]
pub struct EmployeeDto {
    pub id:     u64,
    pub name:   String,
    pub salary: f64,
}

impl From<&Employee> for EmployeeDto {
    fn from(employee: &Employee) -> Self {
        Self {
            id:     employee.id().as_u64(),
            name:   employee.name().to_string(),
            salary: employee.salary(),
        }
    }
}

/// 一覧レスポンスの `payload`
#[derive(Debug, Serialize)]
pub struct EmployeeListData {
    pub employees: Vec<EmployeeDto>,
}

/// 詳細レスポンスの `payload`
#[derive(Debug, Serialize)]
pub struct EmployeeData {
    pub employee: EmployeeDto,
}

// --- ヘルパー ---

/// パスの ID を解釈する。解釈できなければ操作ごとの 404
///
/// 解釈できた ID は現在のスパンの `employee_id` に記録する。
fn parse_id(
    path: Result<Path<String>, PathRejection>,
    missing: Missing,
) -> Result<EmployeeId, ApiError> {
    let Path(raw) = path.map_err(|rejection| {
        tracing::debug!(%rejection, "パスの ID を読み取れません");
        ApiError::NotFound(missing)
    })?;
    let id: EmployeeId = raw
        .parse()
        .map_err(|_: DomainError| ApiError::NotFound(missing))?;
    tracing::Span::current().record("employee_id", id.as_u64());
    Ok(id)
}

/// ボディから `payload` を取り出す
///
/// Content-Type が JSON でなければ [`ApiError::BodyNotJson`]。
/// JSON として読めない、または `payload` がない場合は全フィールドの型不一致とする。
fn read_payload(
    body: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Result<EmployeePayload, ApiError> {
    match body {
        Ok(Json(EmployeeRequest {
            payload: Some(payload),
        })) => Ok(payload),
        Ok(Json(EmployeeRequest { payload: None })) => Err(all_fields_invalid()),
        Err(JsonRejection::MissingJsonContentType(rejection)) => {
            tracing::debug!(%rejection, "Content-Type が JSON ではありません");
            Err(ApiError::BodyNotJson)
        }
        Err(rejection) => {
            tracing::debug!(%rejection, "リクエストボディを解釈できません");
            Err(all_fields_invalid())
        }
    }
}

fn all_fields_invalid() -> ApiError {
    ApiError::Validation(vec![
        FieldViolation::NameNotText,
        FieldViolation::SalaryNotNumber,
    ])
}

fn into_validation_error(err: DomainError) -> ApiError {
    match err {
        DomainError::Validation(violations) => ApiError::Validation(violations),
        DomainError::InvalidId(_) => all_fields_invalid(),
    }
}

fn acknowledged() -> Json<PayloadResponse<Acknowledgement>> {
    Json(PayloadResponse::new(Acknowledgement::success()))
}

// --- ハンドラ ---

/// GET /employees
///
/// 全従業員を ID 昇順で返す。ページングなし。
#[tracing::instrument(skip_all)]
pub async fn list_employees(
    State(state): State<Arc<EmployeeState>>,
) -> Result<impl IntoResponse, ApiError> {
    let employees = state.repository.find_all().await?;

    let response = PayloadResponse::new(EmployeeListData {
        employees: employees.iter().map(EmployeeDto::from).collect(),
    });
    Ok((StatusCode::OK, Json(response)))
}

/// GET /employees/{id}
///
/// ## レスポンス
///
/// - `200 OK`: 従業員
/// - `404 Not Found`: `EMPLOYEES002`
#[tracing::instrument(skip_all, fields(employee_id = tracing::field::Empty))]
pub async fn get_employee(
    State(state): State<Arc<EmployeeState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(path, Missing::Employee)?;

    let employee = state
        .repository
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound(Missing::Employee))?;

    let response = PayloadResponse::new(EmployeeData {
        employee: EmployeeDto::from(&employee),
    });
    Ok((StatusCode::OK, Json(response)))
}

/// POST /employees
///
/// 作成した従業員の ID は `Location` ヘッダーで返す（ボディは完了通知のみ）。
///
/// ## レスポンス
///
/// - `200 OK`: 完了通知
/// - `422 Unprocessable Entity`: `EMPLOYEES001`（INSERT は実行しない）
#[tracing::instrument(skip_all)]
pub async fn create_employee(
    State(state): State<Arc<EmployeeState>>,
    body: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = read_payload(body)?;
    let input = NewEmployee::from_json(payload.name.as_ref(), payload.salary.as_ref())
        .map_err(into_validation_error)?;

    let id = state.repository.insert(&input).await?;
    tracing::info!(employee_id = %id, "従業員を作成しました");

    Ok((
        StatusCode::OK,
        [(header::LOCATION, format!("/employees/{id}"))],
        acknowledged(),
    ))
}

/// PUT /employees/{id}
///
/// 指定されたフィールドのみ更新する。未指定・`null` のフィールドは現在の値を維持する。
///
/// ## レスポンス
///
/// - `200 OK`: 完了通知
/// - `404 Not Found`: `EMPLOYEES004`
/// - `422 Unprocessable Entity`: `EMPLOYEES001`
#[tracing::instrument(skip_all, fields(employee_id = tracing::field::Empty))]
pub async fn update_employee(
    State(state): State<Arc<EmployeeState>>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(path, Missing::NothingUpdated)?;
    let payload = read_payload(body)?;
    let changes = EmployeeChanges::from_json(payload.name.as_ref(), payload.salary.as_ref())
        .map_err(into_validation_error)?;

    if !state.repository.update(id, &changes).await? {
        return Err(ApiError::NotFound(Missing::NothingUpdated));
    }
    tracing::info!(employee_id = %id, "従業員を更新しました");

    Ok((StatusCode::OK, acknowledged()))
}

/// DELETE /employees/{id}
///
/// ## レスポンス
///
/// - `200 OK`: 完了通知
/// - `404 Not Found`: `EMPLOYEES003`
#[tracing::instrument(skip_all, fields(employee_id = tracing::field::Empty))]
pub async fn delete_employee(
    State(state): State<Arc<EmployeeState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(path, Missing::NothingDeleted)?;

    if !state.repository.delete(id).await? {
        return Err(ApiError::NotFound(Missing::NothingDeleted));
    }
    tracing::info!(employee_id = %id, "従業員を削除しました");

    Ok((StatusCode::OK, acknowledged()))
}
