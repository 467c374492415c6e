//! # エラーレスポンスエンベロープ
//!
//! 全エンドポイント共通のエラー形式 `{ "error": { code, message, httpStatus } }` を提供する。
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換はサービス側の責務
//! - `message` は常に配列。バリデーションエラーではフィールドごとに 1 要素になる

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// 例外メッセージの接頭辞
const EXCEPTION_PREFIX: &str = "Error: ValidationException:";

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// エラーレスポンスの本体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// サービス固有のエラーコード（例: `EMPLOYEES002`）
    pub code:        String,
    /// 人間可読なメッセージ
    pub message:     Vec<String>,
    /// HTTP ステータスコード（レスポンスのステータスと一致させる）
    #[serde(rename = "httpStatus")]
    pub http_status: u16,
}

impl ErrorResponse {
    /// メッセージをそのまま使う汎用コンストラクタ
    pub fn new(code: impl Into<String>, message: Vec<String>, http_status: u16) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message,
                http_status,
            },
        }
    }

    /// 各詳細に `Error: ValidationException:` 接頭辞を付けて作成する
    ///
    /// ```
    /// use employees_shared::ErrorResponse;
    ///
    /// let response = ErrorResponse::exception("EMPLOYEES002", 404, ["見つかりません"]);
    /// assert_eq!(
    ///     response.error.message,
    ///     vec!["Error: ValidationException: 見つかりません".to_string()]
    /// );
    /// ```
    pub fn exception<I>(code: impl Into<String>, http_status: u16, details: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let message = details
            .into_iter()
            .map(|detail| format!("{EXCEPTION_PREFIX} {detail}"))
            .collect();
        Self::new(code, message, http_status)
    }

    /// エラーコードを取得する
    pub fn code(&self) -> &str {
        &self.error.code
    }
}
