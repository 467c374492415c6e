//! # Employees ドメイン層
//!
//! 従業員エンティティと、その作成・更新入力の検証ルールを定義する。
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//!  ↘             ↑
//!    ────────────┘
//! ```
//!
//! ドメイン層はインフラ層にも HTTP フレームワークにも依存しない。

pub mod employee;
pub mod error;

pub use error::{DomainError, FieldViolation};
