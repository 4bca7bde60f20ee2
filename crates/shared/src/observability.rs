//! # Observability 基盤
//!
//! トレーシングの初期化を提供する。
//!
//! - `LOG_FORMAT`: `json` / `pretty`（大文字小文字は区別しない）
//! - `RUST_LOG`: `EnvFilter` の指定。未設定・不正なら [`DEFAULT_ENV_FILTER`]

use std::{env, str::FromStr};

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_ENV_FILTER: &str = "info,roomres=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumString, strum::Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// 1 行 1 イベントの JSON（本番向け）
    Json,
    #[default]
    Pretty,
}

/// トレーシング初期化設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub service_name: String,
    pub log_format:   LogFormat,
    pub env_filter:   String,
}

impl TracingConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::from_lookup(service_name, |name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// トレーシング初期化前に呼ばれるため、不正な `LOG_FORMAT` の警告は stderr に出す。
    pub fn from_lookup(
        service_name: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let log_format = match lookup("LOG_FORMAT") {
            Some(value) => LogFormat::from_str(&value).unwrap_or_else(|_| {
                eprintln!("WARNING: unknown LOG_FORMAT={value:?}, falling back to pretty");
                LogFormat::Pretty
            }),
            None => LogFormat::default(),
        };

        Self {
            service_name: service_name.into(),
            log_format,
            env_filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_ENV_FILTER.to_string()),
        }
    }
}

/// トレーシングを初期化する
///
/// `ErrorLayer` を登録するので、インフラ層エラーの `SpanTrace` に発生元のスパンが残る。
/// サービス名は呼び出し元の `app` スパンの `service` フィールドで JSON に含める。
#[cfg(feature = "observability")]
pub fn init_tracing(config: TracingConfig) {
    use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_new(&config.env_filter).unwrap_or_else(|e| {
        eprintln!(
            "WARNING: invalid RUST_LOG={:?} ({e}), falling back to {DEFAULT_ENV_FILTER}",
            config.env_filter
        );
        EnvFilter::new(DEFAULT_ENV_FILTER)
    });

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();
}
