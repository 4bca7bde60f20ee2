//! # Reservation Service 設定
//!
//! 環境変数から Reservation Service サーバーの設定を読み込む。

use std::env;

use thiserror::Error;

/// 設定の読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    #[error("{name} の値が不正です: {value}")]
    Invalid { name: &'static str, value: String },
}

/// 通知の送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationBackend {
    /// メールサービスへ HTTP で送信する
    #[default]
    Http,
    /// 送信しない（ログ出力のみ）
    Noop,
}

/// Reservation Service サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationConfig {
    /// バインドアドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// データベース接続 URL
    pub database_url: String,
    /// 通知設定
    pub notification: NotificationConfig,
}

/// 通知機能の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    pub backend:           NotificationBackend,
    /// メールサービスのベース URL（backend=http の場合に使用）
    pub email_service_url: String,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_EMAIL_SERVICE_URL: &str = "http://localhost:8080";

impl ReservationConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = required(&lookup, "RESERVATION_PORT")?;
        let port = port.parse().map_err(|_| ConfigError::Invalid {
            name:  "RESERVATION_PORT",
            value: port,
        })?;

        Ok(Self {
            host: lookup("RESERVATION_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url: required(&lookup, "DATABASE_URL")?,
            notification: NotificationConfig::from_lookup(&lookup)?,
        })
    }
}

impl NotificationConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = match lookup("NOTIFICATION_BACKEND") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "NOTIFICATION_BACKEND",
                value,
            })?,
            None => NotificationBackend::default(),
        };

        Ok(Self {
            backend,
            email_service_url: lookup("EMAIL_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_EMAIL_SERVICE_URL.to_string()),
        })
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    lookup(name).ok_or(ConfigError::Missing(name))
}
