//! # 成功レスポンスエンベロープ
//!
//! 成功時のレスポンス形式 `{ "payload": T }` と、
//! 更新系操作が返す汎用の完了通知を提供する。

use serde::{Deserialize, Serialize};

/// 成功レスポンスの統一型
///
/// すべての成功レスポンスは `{ "payload": T }` 形式で返す。
/// エラー時は [`ErrorResponse`](crate::ErrorResponse) の `{ "error": ... }` 形式になり、
/// 両者が同じレスポンスに同居することはない。
///
/// ## 使用例
///
/// ```
/// use employees_shared::PayloadResponse;
///
/// let response = PayloadResponse::new("hello");
/// assert_eq!(response.payload, "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadResponse<T> {
    pub payload: T,
}

impl<T> PayloadResponse<T> {
    /// 新しい `PayloadResponse` を作成する
    pub fn new(payload: T) -> Self {
        Self { payload }
    }
}

/// 更新系操作（作成・更新・削除）の完了通知
///
/// 作成したレコードを返さず、固定のコードとメッセージのみを返す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub code:    String,
    pub message: String,
}

impl Acknowledgement {
    /// 成功時のコード
    pub const SUCCESS_CODE: &'static str = "CRG-000";

    /// 成功時のメッセージ
    pub const SUCCESS_MESSAGE: &'static str = "La operación se ejecutó con éxito.";

    /// 成功の完了通知を作成する
    pub fn success() -> Self {
        Self {
            code:    Self::SUCCESS_CODE.to_string(),
            message: Self::SUCCESS_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_serializeでpayloadキーに包まれる() {
        let response = PayloadResponse::new(vec!["a", "b"]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json, serde_json::json!({ "payload": ["a", "b"] }));
    }

    #[test]
    fn test_successの完了通知の形状() {
        let response = PayloadResponse::new(Acknowledgement::success());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "payload": {
                    "code": "CRG-000",
                    "message": "La operación se ejecutó con éxito."
                }
            })
        );
    }

    #[test]
    fn test_deserializeでクライアント側からも読める() {
        let json = r#"{"payload": {"code": "CRG-000", "message": "ok"}}"#;
        let response: PayloadResponse<Acknowledgement> = serde_json::from_str(json).unwrap();

        assert_eq!(response.payload.code, Acknowledgement::SUCCESS_CODE);
        assert_eq!(response.payload.message, "ok");
    }
}
