//! # Employees API 設定
//!
//! 環境変数からサーバーの設定を読み込む。

use std::{env, num::ParseIntError};

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// 設定読み込みのエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 数値として解釈できない
    #[error("{name} は有効な数値である必要があります: {source}")]
    InvalidNumber {
        name:   &'static str,
        #[source]
        source: ParseIntError,
    },
}

/// Employees API サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeesConfig {
    /// バインドアドレス
    pub host:                     String,
    /// ポート番号
    pub port:                     u16,
    /// データベース接続 URL
    pub database_url:             String,
    /// 接続プールの最大接続数
    pub database_max_connections: u32,
}

impl EmployeesConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// テストでプロセスの環境変数を書き換えずに済むよう分離している。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host:                     lookup("EMPLOYEES_HOST")
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port:                     parse_or("EMPLOYEES_PORT", &lookup, DEFAULT_PORT)?,
            database_url:             lookup("DATABASE_URL")
                .ok_or(ConfigError::Missing("DATABASE_URL"))?,
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                &lookup,
                DEFAULT_MAX_CONNECTIONS,
            )?,
        })
    }

    /// バインドするソケットアドレスの文字列表現
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(
    name: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    match lookup(name) {
        Some(raw) => raw
            .parse()
            .map_err(|source| ConfigError::InvalidNumber { name, source }),
        None => Ok(default),
    }
}
