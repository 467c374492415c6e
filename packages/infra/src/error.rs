//! # インフラ層エラー定義
//!
//! データベースとの通信で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターン:
//! - [`InfraError`]: 種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別
//!
//! `From<sqlx::Error>` で生成すると、その時点のスパン情報が自動で記録される。
//!
//! ## ストレージ障害の分類
//!
//! API 層はドライバの詳細を知らずにメッセージを選べるよう、
//! [`InfraError::failure`] で [`StorageFailure`] に分類する。
//!
//! | 条件 | 分類 |
//! |------|------|
//! | I/O・TLS エラー、プール取得タイムアウト、errno 2002 / 2003 | `Connection` |
//! | errno 1045（`ER_ACCESS_DENIED_ERROR`） | `AccessDenied` |
//! | errno 1049（`ER_BAD_DB_ERROR`） | `UnknownDatabase` |
//! | 上記以外 | `Other` |

use std::fmt;

use derive_more::Display;
use sqlx::mysql::MySqlDatabaseError;
use thiserror::Error;
use tracing_error::SpanTrace;

/// MySQL: 認証失敗
pub const ER_ACCESS_DENIED_ERROR: u16 = 1045;
/// MySQL: 存在しないデータベース
pub const ER_BAD_DB_ERROR: u16 = 1049;
/// MySQL クライアント: ソケット接続失敗
pub const CR_CONNECTION_ERROR: u16 = 2002;
/// MySQL クライアント: ホスト接続失敗
pub const CR_CONN_HOST_ERROR: u16 = 2003;

/// インフラ層で発生するエラー
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// データベースエラー
    ///
    /// 接続失敗、認証エラー、SQL 実行失敗など。
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// DB から取得した値がドメインの型に合わない
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

/// ストレージ障害の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageFailure {
    /// DB サーバーに到達できない
    Connection,
    /// 認証に失敗した
    AccessDenied,
    /// 接続先データベースが存在しない
    UnknownDatabase,
    /// 分類できないエラー（errno があれば保持）
    Other(Option<u16>),
}

impl StorageFailure {
    /// errno から分類する
    pub fn from_errno(errno: Option<u16>) -> Self {
        match errno {
            Some(ER_ACCESS_DENIED_ERROR) => Self::AccessDenied,
            Some(ER_BAD_DB_ERROR) => Self::UnknownDatabase,
            Some(CR_CONNECTION_ERROR | CR_CONN_HOST_ERROR) => Self::Connection,
            other => Self::Other(other),
        }
    }
}

impl InfraError {
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Unexpected(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }

    /// MySQL サーバーが返したエラー番号
    ///
    /// サーバーからのエラー応答でない場合（I/O エラーなど）は `None`。
    pub fn errno(&self) -> Option<u16> {
        match &self.kind {
            InfraErrorKind::Database(sqlx::Error::Database(db_err)) => db_err
                .try_downcast_ref::<MySqlDatabaseError>()
                .map(MySqlDatabaseError::number),
            _ => None,
        }
    }

    /// ストレージ障害の種別を判定する
    pub fn failure(&self) -> StorageFailure {
        match &self.kind {
            InfraErrorKind::Database(source) if is_connection_error(source) => {
                StorageFailure::Connection
            }
            _ => StorageFailure::from_errno(self.errno()),
        }
    }
}

fn is_connection_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Database(source),
            span_trace: SpanTrace::capture(),
        }
    }
}
