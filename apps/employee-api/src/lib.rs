//! # Employees API ライブラリ
//!
//! ルーター構築とハンドラを公開する。
//! `tests/` の統合テストからルーター全体を組み立てられるようにしている。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
