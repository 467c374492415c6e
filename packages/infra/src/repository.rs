//! # リポジトリ実装
//!
//! リポジトリトレイトと、その MySQL 実装を提供する。
//!
//! ## 設計方針
//!
//! - **1 操作 1 クエリ**: 各メソッドはパラメータ化された SQL を 1 回だけ実行する
//! - **テスタビリティ**: ハンドラはトレイト経由で依存し、テストではモックに差し替える

pub mod employee_repository;

pub use employee_repository::{EmployeeRepository, MySqlEmployeeRepository};
