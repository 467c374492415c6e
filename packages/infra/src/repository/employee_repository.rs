//! # EmployeeRepository
//!
//! `employee` テーブルへの CRUD を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **部分更新は SQL 側で解決**: `IFNULL(?, col)` で未指定カラムを維持し、
//!   読み取り → 書き込みの 2 往復を避ける
//! - **該当なしは bool で返す**: 更新・削除で一致する行がなかった場合は
//!   エラーではなく `false`。404 への変換はハンドラの責務
//! - **ランタイムクエリ**: `sqlx::query!` のコンパイル時検証は DB 接続を要求するため使わない

use async_trait::async_trait;
use employees_domain::employee::{Employee, EmployeeChanges, EmployeeId, NewEmployee};
use sqlx::{FromRow, MySqlPool};

use crate::error::InfraError;

/// 従業員リポジトリトレイト
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// 全件を ID 昇順で取得
    async fn find_all(&self) -> Result<Vec<Employee>, InfraError>;

    /// ID で検索
    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, InfraError>;

    /// 新規作成し、採番された ID を返す
    async fn insert(&self, employee: &NewEmployee) -> Result<EmployeeId, InfraError>;

    /// 部分更新する。一致する行がなければ `false`
    async fn update(&self, id: EmployeeId, changes: &EmployeeChanges) -> Result<bool, InfraError>;

    /// 削除する。一致する行がなければ `false`
    async fn delete(&self, id: EmployeeId) -> Result<bool, InfraError>;

    /// DB への疎通確認（readiness check 用）
    async fn ping(&self) -> Result<(), InfraError>;
}

/// `employee` テーブルの行
#[derive(Debug, FromRow)]
struct EmployeeRow {
    id:     u64,
    name:   String,
    salary: f64,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee::from_db(EmployeeId::new(row.id), row.name, row.salary)
    }
}

/// MySQL 実装の EmployeeRepository
#[derive(Debug, Clone)]
pub struct MySqlEmployeeRepository {
    pool: MySqlPool,
}

impl MySqlEmployeeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for MySqlEmployeeRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Employee>, InfraError> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, name, salary
            FROM employee
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, InfraError> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, name, salary
            FROM employee
            WHERE id = ?
            "#,
        )
        .bind(id.as_u64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Employee::from))
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, employee: &NewEmployee) -> Result<EmployeeId, InfraError> {
        let result = sqlx::query(
            r#"
            INSERT INTO employee (name, salary)
            VALUES (?, ?)
            "#,
        )
        .bind(&employee.name)
        .bind(employee.salary)
        .execute(&self.pool)
        .await?;

        match result.last_insert_id() {
            0 => Err(InfraError::unexpected("INSERT が ID を採番しませんでした")),
            id => Ok(EmployeeId::new(id)),
        }
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn update(&self, id: EmployeeId, changes: &EmployeeChanges) -> Result<bool, InfraError> {
        // sqlx の MySQL ドライバは CLIENT_FOUND_ROWS で接続するため、
        // rows_affected は「値が変わった行数」ではなく「一致した行数」
        let result = sqlx::query(
            r#"
            UPDATE employee
            SET name = IFNULL(?, name), salary = IFNULL(?, salary)
            WHERE id = ?
            "#,
        )
        .bind(changes.name.as_deref())
        .bind(changes.salary)
        .bind(id.as_u64())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: EmployeeId) -> Result<bool, InfraError> {
        let result = sqlx::query(
            r#"
            DELETE FROM employee
            WHERE id = ?
            "#,
        )
        .bind(id.as_u64())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), InfraError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
