//! # Employees API エラー定義
//!
//! ハンドラで発生するエラーと、エラーエンベロープへの変換を定義する。
//!
//! ## エラーコード
//!
//! | コード | HTTP ステータス | 用途 |
//! |--------|----------------|------|
//! | `EMPLOYEES001` | 422 | 入力の型が不正、またはボディが JSON でない |
//! | `EMPLOYEES002` | 404 | 取得対象の従業員が存在しない |
//! | `EMPLOYEES003` | 404 | 削除対象の従業員が存在しない |
//! | `EMPLOYEES004` | 404 | 更新対象の従業員が存在しない |
//! | `EMPLOYEES404` | 404 | 存在しないエンドポイント |
//! | `EMPLOYEES500` | 500 | ストレージ障害 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use employees_domain::FieldViolation;
use employees_infra::{InfraError, StorageFailure};
use employees_shared::ErrorResponse;
use thiserror::Error;

pub const VALIDATION_CODE: &str = "EMPLOYEES001";
pub const EMPLOYEE_NOT_FOUND_CODE: &str = "EMPLOYEES002";
pub const NOTHING_DELETED_CODE: &str = "EMPLOYEES003";
pub const NOTHING_UPDATED_CODE: &str = "EMPLOYEES004";
pub const ROUTE_NOT_FOUND_CODE: &str = "EMPLOYEES404";
pub const STORAGE_CODE: &str = "EMPLOYEES500";

/// 対象行が見つからなかった操作
///
/// 操作ごとにエラーコードとメッセージが異なる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    /// 取得
    Employee,
    /// 削除
    NothingDeleted,
    /// 更新
    NothingUpdated,
}

impl Missing {
    pub fn code(self) -> &'static str {
        match self {
            Missing::Employee => EMPLOYEE_NOT_FOUND_CODE,
            Missing::NothingDeleted => NOTHING_DELETED_CODE,
            Missing::NothingUpdated => NOTHING_UPDATED_CODE,
        }
    }

    pub fn detail(self) -> &'static str {
        match self {
            Missing::Employee => "No se encontraron registros segun el id",
            Missing::NothingDeleted => "No se afecto ningun registros",
            Missing::NothingUpdated => {
                "La operación no se ejecutó correctamente, revisar los datos ingresados."
            }
        }
    }
}

/// Employees API で発生するエラー
///
/// `IntoResponse` を実装しているため、ハンドラは `Result<_, ApiError>` を返すだけでよい。
#[derive(Debug, Error)]
pub enum ApiError {
    /// 入力の型が不正（422）
    #[error("バリデーションエラー: {0:?}")]
    Validation(Vec<FieldViolation>),

    /// `Content-Type: application/json` がない（422）
    #[error("リクエストボディが JSON ではありません")]
    BodyNotJson,

    /// 対象行が存在しない（404）
    #[error("対象が見つかりません: {0:?}")]
    NotFound(Missing),

    /// 存在しないエンドポイント（404）
    #[error("エンドポイントが見つかりません")]
    RouteNotFound,

    /// ストレージ障害（500）
    #[error("ストレージエラー: {0}")]
    Storage(#[from] InfraError),
}

/// ストレージエラーを (HTTP ステータス, エラーコード, 原因メッセージ) に変換する
///
/// 原因メッセージは障害種別ごとの固定文言で、ドライバのエラー文字列は含めない。
pub fn translate_storage_error(err: &InfraError) -> (StatusCode, &'static str, &'static str) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        STORAGE_CODE,
        storage_cause(err.failure()),
    )
}

fn storage_cause(failure: StorageFailure) -> &'static str {
    match failure {
        StorageFailure::Connection => "Error con la conexion de la base de datos",
        StorageFailure::AccessDenied => "ER_ACCESS_DENIED_ERROR",
        StorageFailure::UnknownDatabase => "ER_BAD_DB_ERROR",
        StorageFailure::Other(_) => "Error inesperado de base de datos",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(violations) => {
                let status = StatusCode::UNPROCESSABLE_ENTITY;
                (
                    status,
                    ErrorResponse::exception(VALIDATION_CODE, status.as_u16(), violations),
                )
            }
            ApiError::BodyNotJson => {
                let status = StatusCode::UNPROCESSABLE_ENTITY;
                (
                    status,
                    ErrorResponse::exception(
                        VALIDATION_CODE,
                        status.as_u16(),
                        ["El cuerpo de la solicitud debe ser JSON (Content-Type: application/json)"],
                    ),
                )
            }
            ApiError::NotFound(missing) => {
                let status = StatusCode::NOT_FOUND;
                (
                    status,
                    ErrorResponse::exception(missing.code(), status.as_u16(), [missing.detail()]),
                )
            }
            ApiError::RouteNotFound => {
                let status = StatusCode::NOT_FOUND;
                (
                    status,
                    ErrorResponse::new(
                        ROUTE_NOT_FOUND_CODE,
                        vec!["Error: endpoint not found".to_string()],
                        status.as_u16(),
                    ),
                )
            }
            ApiError::Storage(err) => {
                let (status, code, cause) = translate_storage_error(&err);
                // 内部エラーの詳細はログのみ
                tracing::error!(
                    errno = ?err.errno(),
                    failure = ?err.failure(),
                    span_trace = %err.span_trace(),
                    "ストレージエラー: {err}"
                );
                (
                    status,
                    ErrorResponse::exception(code, status.as_u16(), [cause]),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn test_接続障害は接続エラーのメッセージに変換される() {
        let err: InfraError =
            sqlx::Error::Io(io::Error::from(io::ErrorKind::ConnectionRefused)).into();

        let (status, code, cause) = translate_storage_error(&err);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "EMPLOYEES500");
        assert_eq!(cause, "Error con la conexion de la base de datos");
    }

    #[rstest]
    #[case(StorageFailure::from_errno(Some(1045)), "ER_ACCESS_DENIED_ERROR")]
    #[case(StorageFailure::from_errno(Some(1049)), "ER_BAD_DB_ERROR")]
    #[case(StorageFailure::from_errno(Some(2002)), "Error con la conexion de la base de datos")]
    #[case(StorageFailure::from_errno(Some(1062)), "Error inesperado de base de datos")]
    fn test_errnoごとの原因メッセージ(#[case] failure: StorageFailure, #[case] expected: &str) {
        assert_eq!(storage_cause(failure), expected);
    }

    #[test]
    fn test_分類できないエラーは固定の文言になる() {
        let err = InfraError::unexpected("壊れた行");

        let (_, _, cause) = translate_storage_error(&err);

        assert_eq!(cause, "Error inesperado de base de datos");
    }

    #[tokio::test]
    async fn test_validationは422で違反ごとにメッセージを持つ() {
        let response = ApiError::Validation(vec![
            FieldViolation::NameNotText,
            FieldViolation::SalaryNotNumber,
        ])
        .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "EMPLOYEES001");
        assert_eq!(json["error"]["httpStatus"], 422);
        assert_eq!(json["error"]["message"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_body_not_jsonは422でcontent_typeを指摘する() {
        let response = ApiError::BodyNotJson.into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(
            json,
            serde_json::json!({
                "error": {
                    "code": "EMPLOYEES001",
                    "message": ["Error: ValidationException: El cuerpo de la solicitud debe ser JSON (Content-Type: application/json)"],
                    "httpStatus": 422
                }
            })
        );
    }

    #[tokio::test]
    async fn test_not_foundは操作ごとのコードを返す() {
        for (missing, code) in [
            (Missing::Employee, "EMPLOYEES002"),
            (Missing::NothingDeleted, "EMPLOYEES003"),
            (Missing::NothingUpdated, "EMPLOYEES004"),
        ] {
            let response = ApiError::NotFound(missing).into_response();

            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let json = body_json(response).await;
            assert_eq!(json["error"]["code"], code);
            assert_eq!(json["error"]["httpStatus"], 404);
        }
    }

    #[tokio::test]
    async fn test_storageは500で原因を含むメッセージを返す() {
        let response = ApiError::Storage(sqlx::Error::PoolTimedOut.into()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(
            json,
            serde_json::json!({
                "error": {
                    "code": "EMPLOYEES500",
                    "message": ["Error: ValidationException: Error con la conexion de la base de datos"],
                    "httpStatus": 500
                }
            })
        );
    }
}
