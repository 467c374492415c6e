//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置し、ここで re-export する
//! - ハンドラは薄く保つ: パラメータ抽出 → リポジトリ呼び出し 1 回 → エンベロープ変換
//! - 依存（リポジトリ）は State で注入し、グローバルな接続プールは持たない

pub mod employee;
pub mod fallback;
pub mod health;

pub use employee::{
    EmployeeState,
    create_employee,
    delete_employee,
    get_employee,
    list_employees,
    update_employee,
};
pub use fallback::route_not_found;
pub use health::{ReadinessState, health_check, readiness_check};
