//! Noop 通知送信実装
//!
//! メールサービスを呼び出さず、ログ出力のみ行う。
//! ローカル開発や通知無効化時に使用する。

use async_trait::async_trait;
use roomres_domain::notification::{NotificationError, ReservationEmail};

use super::NotificationSender;

/// Noop 通知送信（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NoopNotificationSender;

#[async_trait]
impl NotificationSender for NoopNotificationSender {
    async fn send_reservation_email(
        &self,
        email: &ReservationEmail,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            recipient = %email.recipient,
            resource = %email.resource_name,
            "Noop: 予約確認メールの送信をスキップ"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    #[tokio::test]
    async fn send_reservation_emailがエラーを返さない() {
        let sender = NoopNotificationSender;
        let email = ReservationEmail {
            recipient:     "test@example.com".to_string(),
            start_time:    DateTime::from_timestamp(0, 0).unwrap(),
            end_time:      DateTime::from_timestamp(3600, 0).unwrap(),
            building_name: "本館".to_string(),
            resource_name: "会議室A".to_string(),
        };

        let result = sender.send_reservation_email(&email).await;
        assert!(result.is_ok());
    }
}
