//! # Employees API サーバー
//!
//! `employee` テーブルの CRUD を JSON over HTTP で提供する。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `EMPLOYEES_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `EMPLOYEES_PORT` | No | ポート番号（デフォルト: `3000`） |
//! | `DATABASE_URL` | **Yes** | MySQL 接続 URL |
//! | `DATABASE_MAX_CONNECTIONS` | No | 接続プールの最大接続数（デフォルト: `10`） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログレベル（デフォルト: `info,employees=debug`） |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p employees-api
//!
//! # 本番環境
//! DATABASE_URL=mysql://... LOG_FORMAT=json cargo run -p employees-api --release
//! ```
//!
//! 接続プールは遅延接続のため、DB が停止していてもサーバーは起動する。
//! DB の状態は `GET /health/ready` で確認する。

use std::sync::Arc;

use anyhow::Context as _;
use employees_api::{app_builder::build_app, config::EmployeesConfig};
use employees_infra::{db, repository::MySqlEmployeeRepository};
use employees_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(&TracingConfig::from_env("employees-api"));

    let config = EmployeesConfig::from_env().context("設定の読み込みに失敗しました")?;

    let pool = db::create_pool(&config.database_url, config.database_max_connections)
        .context("接続プールの作成に失敗しました")?;
    let repository = Arc::new(MySqlEmployeeRepository::new(pool));

    let app = build_app(repository);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("{addr} にバインドできません"))?;
    tracing::info!("Employees API サーバーが起動しました: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Employees API サーバーを停止しました");
    Ok(())
}

/// Ctrl+C を待つ
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("シグナルハンドラの登録に失敗しました: {e}");
    }
}
