//! # テスト用モックリポジトリ
//!
//! ハンドラテストで使用するインメモリのモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! employees-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use employees_domain::employee::{Employee, EmployeeChanges, EmployeeId, NewEmployee};

use crate::{error::InfraError, repository::EmployeeRepository};

#[derive(Default)]
struct Store {
    employees: BTreeMap<EmployeeId, Employee>,
    last_id:   u64,
    failure:   Option<fn() -> InfraError>,
}

/// インメモリの EmployeeRepository
///
/// `AUTO_INCREMENT` と同様に、削除された ID は再利用しない。
/// [`fail_with`](Self::fail_with) で以降の全操作を失敗させられる。
#[derive(Clone, Default)]
pub struct MockEmployeeRepository {
    store: Arc<Mutex<Store>>,
}

impl MockEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 初期データを投入し、採番された ID を返す
    pub fn seed(&self, name: &str, salary: f64) -> EmployeeId {
        let mut store = self.store.lock().unwrap();
        store.last_id += 1;
        let id = EmployeeId::new(store.last_id);
        store
            .employees
            .insert(id, Employee::from_db(id, name.to_string(), salary));
        id
    }

    /// 以降の全操作を、指定したエラーで失敗させる
    pub fn fail_with(&self, make_error: fn() -> InfraError) {
        self.store.lock().unwrap().failure = Some(make_error);
    }

    /// 保存されている件数
    pub fn len(&self) -> usize {
        self.store.lock().unwrap().employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_failure(store: &Store) -> Result<(), InfraError> {
        match store.failure {
            Some(make_error) => Err(make_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl EmployeeRepository for MockEmployeeRepository {
    async fn find_all(&self) -> Result<Vec<Employee>, InfraError> {
        let store = self.store.lock().unwrap();
        Self::check_failure(&store)?;
        Ok(store.employees.values().cloned().collect())
    }

    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, InfraError> {
        let store = self.store.lock().unwrap();
        Self::check_failure(&store)?;
        Ok(store.employees.get(&id).cloned())
    }

    async fn insert(&self, employee: &NewEmployee) -> Result<EmployeeId, InfraError> {
        let mut store = self.store.lock().unwrap();
        Self::check_failure(&store)?;
        store.last_id += 1;
        let id = EmployeeId::new(store.last_id);
        store.employees.insert(
            id,
            Employee::from_db(id, employee.name.clone(), employee.salary),
        );
        Ok(id)
    }

    async fn update(&self, id: EmployeeId, changes: &EmployeeChanges) -> Result<bool, InfraError> {
        let mut store = self.store.lock().unwrap();
        Self::check_failure(&store)?;
        let Some(current) = store.employees.get(&id) else {
            return Ok(false);
        };
        let updated = current.apply(changes);
        store.employees.insert(id, updated);
        Ok(true)
    }

    async fn delete(&self, id: EmployeeId) -> Result<bool, InfraError> {
        let mut store = self.store.lock().unwrap();
        Self::check_failure(&store)?;
        Ok(store.employees.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), InfraError> {
        let store = self.store.lock().unwrap();
        Self::check_failure(&store)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_削除したidは再利用されない() {
        let repo = MockEmployeeRepository::new();
        let first = repo.seed("Ana", 1000.0);

        assert!(repo.delete(first).await.unwrap());
        let second = repo
            .insert(&NewEmployee {
                name:   "Luis".to_string(),
                salary: 2000.0,
            })
            .await
            .unwrap();

        assert_eq!(second, EmployeeId::new(2));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_fail_withで全操作が失敗する() {
        let repo = MockEmployeeRepository::new();
        repo.seed("Ana", 1000.0);
        repo.fail_with(|| InfraError::from(sqlx::Error::PoolTimedOut));

        assert!(repo.find_all().await.is_err());
        assert!(repo.ping().await.is_err());
    }
}
