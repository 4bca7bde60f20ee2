//! HTTP 通知送信実装
//!
//! 外部メールサービスの `POST {base_url}/email/sendconfirmation` に
//! [`ReservationEmail`] を JSON で送る。

use async_trait::async_trait;
use roomres_domain::notification::{NotificationError, ReservationEmail};

use super::NotificationSender;

const SEND_CONFIRMATION_PATH: &str = "/email/sendconfirmation";

/// HTTP 通知送信
#[derive(Debug, Clone)]
pub struct HttpNotificationSender {
    base_url: String,
    client:   reqwest::Client,
}

impl HttpNotificationSender {
    /// 新しい送信者を作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: メールサービスのベース URL（例: `http://localhost:8080`）
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client:   reqwest::Client::new(),
        }
    }

    /// 送信先 URL
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, SEND_CONFIRMATION_PATH)
    }
}

#[async_trait]
impl NotificationSender for HttpNotificationSender {
    #[tracing::instrument(skip_all, level = "debug", fields(recipient = %email.recipient))]
    async fn send_reservation_email(
        &self,
        email: &ReservationEmail,
    ) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(email)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(%status, "予約確認メールの送信を依頼");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(NotificationError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
