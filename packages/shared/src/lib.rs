//! # Employees 共有ユーティリティ
//!
//! サービス全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - domain / infra / api のすべてから依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum には依存しない（`IntoResponse` 変換は api 側の責務）

pub mod api_response;
pub mod error_response;
pub mod health;
pub mod observability;

pub use api_response::{Acknowledgement, PayloadResponse};
pub use error_response::{ErrorBody, ErrorResponse};
pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
