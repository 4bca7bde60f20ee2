//! 予約ユースケース
//!
//! 予約の参照・保存・キャンセルと、予約確認メールの送信依頼を担う。
//! 「今後」「過去」の境界時刻は呼び出しごとに [`Clock`] から取得する。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use roomres_domain::{
    DomainError,
    clock::Clock,
    notification::ReservationEmail,
    reservation::{
        Reservation,
        ReservationCriteria,
        ReservationDraft,
        ReservationId,
        ReservationScope,
    },
    resource::{Resource, ResourceId},
    user::UserId,
};
use roomres_infra::{
    InfraError,
    notification::NotificationSender,
    repository::{ReservationRepository, ResourceRepository, UserRepository},
};
use roomres_shared::{event_log::event, log_business_event};

use crate::error::CoreError;

const TIME_WINDOW_CONSTRAINT: &str = "reservations_time_window_check";
const RESOURCE_FK_CONSTRAINT: &str = "reservations_resource_id_fkey";

/// 予約ユースケース
pub struct ReservationUseCaseImpl {
    reservation_repository: Arc<dyn ReservationRepository>,
    user_repository:        Arc<dyn UserRepository>,
    resource_repository:    Arc<dyn ResourceRepository>,
    notification_sender:    Arc<dyn NotificationSender>,
    clock:                  Arc<dyn Clock>,
}

impl ReservationUseCaseImpl {
    pub fn new(
        reservation_repository: Arc<dyn ReservationRepository>,
        user_repository: Arc<dyn UserRepository>,
        resource_repository: Arc<dyn ResourceRepository>,
        notification_sender: Arc<dyn NotificationSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reservation_repository,
            user_repository,
            resource_repository,
            notification_sender,
            clock,
        }
    }

    /// ユーザーの全予約を取得する（キャンセル済みを含む、ID 順）
    pub async fn get_reservations_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Reservation>, CoreError> {
        Ok(self.reservation_repository.find_by_user_id(user_id).await?)
    }

    /// ユーザーの今後の予約を取得する（開始時刻が現在より後）
    pub async fn get_upcoming_reservations_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Reservation>, CoreError> {
        let now = self.clock.now();
        Ok(self
            .reservation_repository
            .find_upcoming_by_user_id(user_id, now)
            .await?)
    }

    /// ユーザーの過去の予約を取得する（終了時刻が現在より前）
    pub async fn get_past_reservations_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Reservation>, CoreError> {
        let now = self.clock.now();
        Ok(self
            .reservation_repository
            .find_past_by_user_id(user_id, now)
            .await?)
    }

    /// 期間区分に応じてユーザーの予約を取得する
    pub async fn get_reservations_by_scope(
        &self,
        user_id: &UserId,
        scope: ReservationScope,
    ) -> Result<Vec<Reservation>, CoreError> {
        match scope {
            ReservationScope::All => self.get_reservations_by_user_id(user_id).await,
            ReservationScope::Upcoming => self.get_upcoming_reservations_by_user_id(user_id).await,
            ReservationScope::Past => self.get_past_reservations_by_user_id(user_id).await,
        }
    }

    /// ID で予約を取得する
    ///
    /// 存在しない場合は `NotFound`。
    pub async fn get_reservation_by_id(&self, id: ReservationId) -> Result<Reservation, CoreError> {
        self.reservation_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound {
                    entity_type: "Reservation",
                    id:          id.to_string(),
                }
                .into()
            })
    }

    /// 時間帯 `(start, end)` に厳密に含まれる予約のリソース ID を取得する
    pub async fn get_reservation_resource_ids(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ResourceId>, CoreError> {
        Ok(self
            .reservation_repository
            .find_resource_ids_in_window(start, end)
            .await?)
    }

    /// 予約を保存する（upsert）
    ///
    /// 時間帯の制約違反と存在しないリソースの参照は `BadRequest` にマッピングする。
    pub async fn save_reservation(&self, draft: ReservationDraft) -> Result<Reservation, CoreError> {
        let saved = self
            .reservation_repository
            .save(draft)
            .await
            .map_err(map_save_error)?;

        log_business_event!(
            event.category = event::category::RESERVATION,
            event.action = event::action::RESERVATION_SAVED,
            event.entity_type = event::entity_type::RESERVATION,
            event.entity_id = %saved.id(),
            event.actor_id = %saved.user_id(),
            event.result = event::result::SUCCESS,
            "予約を保存"
        );

        Ok(saved)
    }

    /// 予約をキャンセルし、影響行数を返す
    ///
    /// 存在しない、またはキャンセル済みの予約に対しては 0 を返す。
    pub async fn cancel_reservation(&self, id: ReservationId) -> Result<u64, CoreError> {
        let affected = self.reservation_repository.cancel(id).await?;

        if affected > 0 {
            log_business_event!(
                event.category = event::category::RESERVATION,
                event.action = event::action::RESERVATION_CANCELLED,
                event.entity_type = event::entity_type::RESERVATION,
                event.entity_id = %id,
                event.result = event::result::SUCCESS,
                "予約をキャンセル"
            );
        }

        Ok(affected)
    }

    /// 検索条件に一致する予約を取得する
    pub async fn get_reservations_by_criteria(
        &self,
        criteria: &ReservationCriteria,
    ) -> Result<Vec<Reservation>, CoreError> {
        Ok(self.reservation_repository.find_by_criteria(criteria).await?)
    }

    /// 全予約を取得する
    pub async fn get_all(&self) -> Result<Vec<Reservation>, CoreError> {
        Ok(self.reservation_repository.find_all().await?)
    }

    /// 予約確認メールの送信をメールサービスへ依頼する
    ///
    /// 予約者が見つからない場合は `NotFound`。送信失敗は再送せずに返す。
    pub async fn post_to_email_service(
        &self,
        reservation: &Reservation,
        resource: &Resource,
    ) -> Result<(), CoreError> {
        let user = self
            .user_repository
            .find_by_id(reservation.user_id())
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity_type: "User",
                id:          reservation.user_id().to_string(),
            })?;

        let email = ReservationEmail::new(reservation, &user, resource);

        match self.notification_sender.send_reservation_email(&email).await {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.entity_type = event::entity_type::RESERVATION,
                    event.entity_id = %reservation.id(),
                    event.result = event::result::SUCCESS,
                    notification.recipient = %email.recipient,
                    "予約確認メール送信成功"
                );
                Ok(())
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.entity_type = event::entity_type::RESERVATION,
                    event.entity_id = %reservation.id(),
                    event.result = event::result::FAILURE,
                    notification.recipient = %email.recipient,
                    error = %e,
                    "予約確認メール送信失敗"
                );
                Err(e.into())
            }
        }
    }

    /// 予約 ID から予約とリソースを解決し、予約確認メールを送る
    pub async fn send_confirmation(&self, id: ReservationId) -> Result<(), CoreError> {
        let reservation = self.get_reservation_by_id(id).await?;
        let resource = self
            .resource_repository
            .find_by_id(reservation.resource_id())
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity_type: "Resource",
                id:          reservation.resource_id().to_string(),
            })?;

        self.post_to_email_service(&reservation, &resource).await
    }
}

fn map_save_error(err: InfraError) -> CoreError {
    match err.violated_constraint() {
        Some(TIME_WINDOW_CONSTRAINT) => {
            CoreError::BadRequest("開始時刻は終了時刻より前である必要があります".to_string())
        }
        Some(RESOURCE_FK_CONSTRAINT) => {
            CoreError::BadRequest("指定されたリソースが存在しません".to_string())
        }
        _ => CoreError::Database(err),
    }
}
