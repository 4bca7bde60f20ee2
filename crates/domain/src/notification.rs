//! # 予約確認通知
//!
//! 外部メールサービスに送る予約確認メールのペイロードを定義する。
//!
//! ## 設計方針
//!
//! - **永続化しない**: [`ReservationEmail`] は送信のためだけに組み立てる一時的な値
//! - **送信手段の分離**: 実際の送信は infra 層の `NotificationSender` が担う
//! - **失敗は呼び出し元へ**: 送信失敗は [`NotificationError`] として返し、再送しない

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{reservation::Reservation, resource::Resource, user::User};

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メールサービスへの送信に失敗（接続失敗など）
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// メールサービスが 2xx 以外を返した
    #[error("メールサービスがリクエストを拒否: status={status}, body={body}")]
    Rejected { status: u16, body: String },
}

/// 予約確認メールのペイロード
///
/// メールサービスの `/email/sendconfirmation` が受け取る JSON 形式。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationEmail {
    /// 送信先メールアドレス（予約者）
    pub recipient:     String,
    pub start_time:    DateTime<Utc>,
    pub end_time:      DateTime<Utc>,
    pub building_name: String,
    pub resource_name: String,
}

impl ReservationEmail {
    /// 予約・予約者・リソースからペイロードを組み立てる
    pub fn new(reservation: &Reservation, user: &User, resource: &Resource) -> Self {
        Self {
            recipient:     user.email().as_str().to_string(),
            start_time:    reservation.start_time(),
            end_time:      reservation.end_time(),
            building_name: resource.building().name.clone(),
            resource_name: resource.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        reservation::{NewReservation, ReservationId},
        resource::{Building, BuildingId, ResourceId},
        user::{Email, UserId},
    };

    #[test]
    fn test_ペイロードは予約者のメールとリソースの名称から組み立てられる() {
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let end = DateTime::from_timestamp(1_700_003_600, 0).unwrap();
        let reservation = Reservation::new(NewReservation {
            id:          ReservationId::new(1),
            user_id:     UserId::new("alice"),
            resource_id: ResourceId::new(5),
            start_time:  start,
            end_time:    end,
            cancelled:   false,
        });
        let user = User::new(
            UserId::new("alice"),
            Email::new("alice@example.com").unwrap(),
            "Alice",
        );
        let resource = Resource::new(
            ResourceId::new(5),
            "Room 101",
            Building {
                id:   BuildingId::new(2),
                name: "Reston HQ".to_string(),
            },
        );

        let email = ReservationEmail::new(&reservation, &user, &resource);

        assert_eq!(email.recipient, "alice@example.com");
        assert_eq!(email.building_name, "Reston HQ");
        assert_eq!(email.resource_name, "Room 101");
        assert_eq!(email.start_time, start);
        assert_eq!(email.end_time, end);
    }

    #[test]
    fn test_ペイロードはキャメルケースのjsonになる() {
        let email = ReservationEmail {
            recipient:     "alice@example.com".to_string(),
            start_time:    DateTime::from_timestamp(0, 0).unwrap(),
            end_time:      DateTime::from_timestamp(3600, 0).unwrap(),
            building_name: "Reston HQ".to_string(),
            resource_name: "Room 101".to_string(),
        };

        let json = serde_json::to_value(&email).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "recipient": "alice@example.com",
                "startTime": "1970-01-01T00:00:00Z",
                "endTime": "1970-01-01T01:00:00Z",
                "buildingName": "Reston HQ",
                "resourceName": "Room 101",
            })
        );
    }
}
