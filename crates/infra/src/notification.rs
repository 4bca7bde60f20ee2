//! # 通知送信
//!
//! 予約確認メールを外部メールサービスへ依頼するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait で送信手段を抽象化
//! - **2 つの実装**: HTTP（メールサービスへ POST）、Noop（通知無効化時）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択
//! - **再送しない**: タイムアウト・リトライは持たず、失敗はそのまま呼び出し元へ返す

mod http;
mod noop;

use async_trait::async_trait;
pub use http::HttpNotificationSender;
pub use noop::NoopNotificationSender;
use roomres_domain::notification::{NotificationError, ReservationEmail};

/// 予約確認メール送信トレイト
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 予約確認メールの送信を依頼する
    async fn send_reservation_email(&self, email: &ReservationEmail)
    -> Result<(), NotificationError>;
}
