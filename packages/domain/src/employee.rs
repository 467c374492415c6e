//! # 従業員
//!
//! `employee` テーブルの 1 行に対応するエンティティと、
//! 作成・部分更新の入力を表す型。
//!
//! ## 入力検証
//!
//! リクエストボディは JSON の任意の値として届くため、型の検証は
//! `serde_json::Value` を受け取って行う。serde の型付きデシリアライズに
//! 任せると、どのフィールドが不正だったかをまとめて報告できないため。
//!
//! | フィールド | 期待する型 | 作成時 | 更新時 |
//! |-----------|-----------|--------|--------|
//! | `name` | 文字列 | 必須 | 任意（`null` / 未指定は変更なし） |
//! | `salary` | 数値 | 必須 | 任意（`null` / 未指定は変更なし） |

use std::str::FromStr;

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, FieldViolation};

/// 従業員 ID
///
/// ストレージ（`AUTO_INCREMENT`）が採番する。採番後は不変。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct EmployeeId(u64);

impl EmployeeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl FromStr for EmployeeId {
    type Err = DomainError;

    /// パスパラメータの文字列から ID を作る
    ///
    /// 前後の空白や符号付きの値は受け付けない。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| DomainError::InvalidId(s.to_string()))
    }
}

/// 従業員エンティティ
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    id:     EmployeeId,
    name:   String,
    salary: f64,
}

impl Employee {
    /// DB から取得した値で復元する
    pub fn from_db(id: EmployeeId, name: String, salary: f64) -> Self {
        Self { id, name, salary }
    }

    pub fn id(&self) -> EmployeeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn salary(&self) -> f64 {
        self.salary
    }

    /// 部分更新を適用した新しい値を返す
    ///
    /// `None` のフィールドは現在の値を維持する（SQL の `IFNULL(?, col)` と同じ意味）。
    pub fn apply(&self, changes: &EmployeeChanges) -> Self {
        Self {
            id:     self.id,
            name:   changes.name.clone().unwrap_or_else(|| self.name.clone()),
            salary: changes.salary.unwrap_or(self.salary),
        }
    }
}

/// 新規作成の入力
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub name:   String,
    pub salary: f64,
}

impl NewEmployee {
    /// JSON の値から作成入力を組み立てる
    ///
    /// 両フィールドとも必須。未指定・`null` も型不一致として扱い、
    /// 違反はフィールド順（name → salary）にすべて返す。
    pub fn from_json(name: Option<&Value>, salary: Option<&Value>) -> Result<Self, DomainError> {
        let name = name.and_then(Value::as_str);
        let salary = salary.and_then(as_number);

        match (name, salary) {
            (Some(name), Some(salary)) => Ok(Self {
                name: name.to_string(),
                salary,
            }),
            (name, salary) => {
                let mut violations = Vec::new();
                if name.is_none() {
                    violations.push(FieldViolation::NameNotText);
                }
                if salary.is_none() {
                    violations.push(FieldViolation::SalaryNotNumber);
                }
                Err(DomainError::Validation(violations))
            }
        }
    }
}

/// 部分更新の入力
///
/// `None` は「このカラムは変更しない」を意味する。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeChanges {
    pub name:   Option<String>,
    pub salary: Option<f64>,
}

impl EmployeeChanges {
    /// JSON の値から部分更新入力を組み立てる
    ///
    /// 未指定と `null` は変更なし。指定されている場合のみ型を検証する。
    pub fn from_json(name: Option<&Value>, salary: Option<&Value>) -> Result<Self, DomainError> {
        let mut violations = Vec::new();

        let name = match name {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                violations.push(FieldViolation::NameNotText);
                None
            }
        };

        let salary = match salary {
            None | Some(Value::Null) => None,
            Some(value) => {
                let number = as_number(value);
                if number.is_none() {
                    violations.push(FieldViolation::SalaryNotNumber);
                }
                number
            }
        };

        if violations.is_empty() {
            Ok(Self { name, salary })
        } else {
            Err(DomainError::Validation(violations))
        }
    }

    /// 変更対象のフィールドが 1 つもない
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.salary.is_none()
    }
}

/// JSON の数値のみを受け付ける（数値文字列は不可）
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case("1", Some(1))]
    #[case("42", Some(42))]
    #[case("0", Some(0))]
    #[case("abc", None)]
    #[case("-1", None)]
    #[case("1.5", None)]
    #[case("", None)]
    #[case(" 1", None)]
    fn test_employee_idのパース(#[case] input: &str, #[case] expected: Option<u64>) {
        let parsed = input.parse::<EmployeeId>().ok().map(|id| id.as_u64());
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_employee_idはjsonで数値になる() {
        let json = serde_json::to_value(EmployeeId::new(7)).unwrap();
        assert_eq!(json, json!(7));
    }

    // ===== NewEmployee =====

    #[test]
    fn test_new_employee_正しい型で作成できる() {
        let name = json!("Ana");
        let salary = json!(1000);

        let input = NewEmployee::from_json(Some(&name), Some(&salary)).unwrap();

        assert_eq!(input.name, "Ana");
        assert_eq!(input.salary, 1000.0);
    }

    #[rstest]
    #[case(json!(123), json!(1000), vec![FieldViolation::NameNotText])]
    #[case(json!("Ana"), json!("1000"), vec![FieldViolation::SalaryNotNumber])]
    #[case(json!(null), json!(null), vec![FieldViolation::NameNotText, FieldViolation::SalaryNotNumber])]
    #[case(json!(true), json!([1]), vec![FieldViolation::NameNotText, FieldViolation::SalaryNotNumber])]
    fn test_new_employee_型不一致は違反フィールドを列挙する(
        #[case] name: Value,
        #[case] salary: Value,
        #[case] expected: Vec<FieldViolation>,
    ) {
        let err = NewEmployee::from_json(Some(&name), Some(&salary)).unwrap_err();
        assert_eq!(err, DomainError::Validation(expected));
    }

    #[test]
    fn test_new_employee_未指定は型不一致として扱う() {
        let salary = json!(1000);
        let err = NewEmployee::from_json(None, Some(&salary)).unwrap_err();

        assert_eq!(err.violations(), Some(&[FieldViolation::NameNotText][..]));
    }

    #[test]
    fn test_salaryのチェックはnameの型に引きずられない() {
        // name が数値でも salary が数値なら salary 違反は出ない
        let name = json!(1);
        let salary = json!(2500.5);
        let err = NewEmployee::from_json(Some(&name), Some(&salary)).unwrap_err();

        assert_eq!(err.violations(), Some(&[FieldViolation::NameNotText][..]));
    }

    // ===== EmployeeChanges =====

    #[test]
    fn test_employee_changes_未指定とnullは変更なし() {
        let null = Value::Null;

        let changes = EmployeeChanges::from_json(None, Some(&null)).unwrap();

        assert!(changes.is_empty());
    }

    #[test]
    fn test_employee_changes_salaryのみ指定() {
        let salary = json!(2000);

        let changes = EmployeeChanges::from_json(None, Some(&salary)).unwrap();

        assert_eq!(
            changes,
            EmployeeChanges {
                name:   None,
                salary: Some(2000.0),
            }
        );
    }

    #[test]
    fn test_employee_changes_指定された値の型は検証する() {
        let name = json!(["x"]);
        let salary = json!("abc");

        let err = EmployeeChanges::from_json(Some(&name), Some(&salary)).unwrap_err();

        assert_eq!(
            err,
            DomainError::Validation(vec![
                FieldViolation::NameNotText,
                FieldViolation::SalaryNotNumber,
            ])
        );
    }

    // ===== Employee::apply =====

    #[test]
    fn test_applyは未指定フィールドを維持する() {
        let employee = Employee::from_db(EmployeeId::new(1), "Ana".to_string(), 1000.0);
        let changes = EmployeeChanges {
            name:   None,
            salary: Some(1500.0),
        };

        let updated = employee.apply(&changes);

        assert_eq!(updated.id(), EmployeeId::new(1));
        assert_eq!(updated.name(), "Ana");
        assert_eq!(updated.salary(), 1500.0);
    }
}
