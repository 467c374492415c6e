//! # アプリケーション構築
//!
//! State の初期化とルーター構築を担当する。
//! `main.rs` は設定読み込み・接続プール作成とサーバー起動に集中する。

use std::sync::Arc;

use axum::{Router, routing::get};
use employees_infra::repository::EmployeeRepository;
use employees_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::handler::{
    EmployeeState,
    ReadinessState,
    create_employee,
    delete_employee,
    get_employee,
    health_check,
    list_employees,
    readiness_check,
    route_not_found,
    update_employee,
};

/// ルーターを構築する
///
/// リポジトリを差し替えられるようにしているため、テストではモックを渡す。
pub fn build_app(repository: Arc<dyn EmployeeRepository>) -> Router {
    let employee_state = Arc::new(EmployeeState {
        repository: repository.clone(),
    });
    let readiness_state = Arc::new(ReadinessState { repository });

    Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .merge(
            Router::new()
                .route("/employees", get(list_employees).post(create_employee))
                .route(
                    "/employees/{id}",
                    get(get_employee)
                        .put(update_employee)
                        .delete(delete_employee),
                )
                .with_state(employee_state),
        )
        // 未定義のパスも、定義済みパスへの未対応メソッドも同じ 404 エンベロープにする
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        // Request ID レイヤー（下に書いたものが外側）
        // 1. SetRequestIdLayer（最外）: UUID v7 を生成（クライアント提供値があればそちらを使用）
        // 2. TraceLayer: スパンに request_id を含め、全ログに自動注入
        // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
