//! # ドメイン層エラー定義
//!
//! 入力値の検証失敗を表現する。
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 422 Unprocessable Entity | フィールドの型が不正 |
//! | `InvalidId` | 404 Not Found | パスの ID が整数として解釈できない |
//!
//! ステータスへの変換は API 層で行う。

use derive_more::Display;
use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 1 つ以上のフィールドが期待する型を満たさない
    ///
    /// 失敗したフィールドをすべて保持する（最初の 1 件で打ち切らない）。
    #[error("バリデーションエラー: {}", violations_to_string(.0))]
    Validation(Vec<FieldViolation>),

    /// ID が符号なし整数として解釈できない
    #[error("不正な ID: {0}")]
    InvalidId(String),
}

impl DomainError {
    /// Validation バリアントの場合、違反フィールドを返す
    pub fn violations(&self) -> Option<&[FieldViolation]> {
        match self {
            DomainError::Validation(violations) => Some(violations),
            DomainError::InvalidId(_) => None,
        }
    }
}

/// フィールド単位の検証違反
///
/// `Display` はクライアントにそのまま返すメッセージ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FieldViolation {
    /// `name` が文字列でない
    #[display("El tipo de datos de Name no es el correcto, debe contener caracteres")]
    NameNotText,

    /// `salary` が数値でない
    #[display("El tipo de datos de salary no es el correcto, debe contener numbers")]
    SalaryNotNumber,
}

fn violations_to_string(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" / ")
}
