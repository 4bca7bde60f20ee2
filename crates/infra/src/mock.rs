//! # テスト用モック
//!
//! ユースケース・ハンドラテストで使用するインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! roomres-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! 並び順・キャンセルの影響行数・upsert の挙動は PostgreSQL 実装に合わせている。
//! 制約違反（時間帯の CHECK、リソースの外部キー）は再現しない。

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roomres_domain::{
    notification::{NotificationError, ReservationEmail},
    reservation::{Reservation, ReservationCriteria, ReservationDraft, ReservationId},
    resource::{Resource, ResourceId},
    user::{User, UserId},
};

use crate::{
    error::InfraError,
    notification::NotificationSender,
    repository::{ReservationRepository, ResourceRepository, UserRepository},
};

// ===== MockReservationRepository =====

#[derive(Clone, Default)]
pub struct MockReservationRepository {
    reservations: Arc<Mutex<Vec<Reservation>>>,
    next_id:      Arc<Mutex<i32>>,
    fail:         bool,
}

impl MockReservationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// すべての操作がエラーを返すモック
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// 採番済みの予約を直接追加する
    pub fn add_reservation(&self, reservation: Reservation) {
        let mut reservations = self.reservations.lock().unwrap();
        let mut next_id = self.next_id.lock().unwrap();
        *next_id = (*next_id).max(reservation.id().as_i32());
        reservations.push(reservation);
    }

    fn check(&self) -> Result<(), InfraError> {
        if self.fail {
            return Err(InfraError::unexpected("モックの DB エラー"));
        }
        Ok(())
    }

    fn sorted_by_id(&self, filter: impl Fn(&Reservation) -> bool) -> Vec<Reservation> {
        let mut result: Vec<Reservation> = self
            .reservations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter(r))
            .cloned()
            .collect();
        result.sort_by_key(Reservation::id);
        result
    }
}

#[async_trait]
impl ReservationRepository for MockReservationRepository {
    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Vec<Reservation>, InfraError> {
        self.check()?;
        Ok(self.sorted_by_id(|r| r.user_id() == user_id))
    }

    async fn find_upcoming_by_user_id(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Reservation>, InfraError> {
        self.check()?;
        let mut result = self.sorted_by_id(|r| r.user_id() == user_id && r.is_upcoming_at(now));
        result.sort_by_key(|r| (r.start_time(), r.id()));
        Ok(result)
    }

    async fn find_past_by_user_id(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Reservation>, InfraError> {
        self.check()?;
        let mut result = self.sorted_by_id(|r| r.user_id() == user_id && r.is_past_at(now));
        result.sort_by_key(|r| std::cmp::Reverse((r.start_time(), r.id())));
        Ok(result)
    }

    async fn find_by_id(&self, id: ReservationId) -> Result<Option<Reservation>, InfraError> {
        self.check()?;
        Ok(self
            .reservations
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id() == id)
            .cloned())
    }

    async fn find_resource_ids_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ResourceId>, InfraError> {
        self.check()?;
        let mut ids: Vec<ResourceId> = self
            .reservations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| !r.is_cancelled() && r.is_strictly_within(start, end))
            .map(Reservation::resource_id)
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn save(&self, draft: ReservationDraft) -> Result<Reservation, InfraError> {
        self.check()?;
        let mut reservations = self.reservations.lock().unwrap();

        if let Some(id) = draft.id
            && let Some(pos) = reservations.iter().position(|r| r.id() == id)
        {
            let saved = Reservation::from_draft(id, draft);
            reservations[pos] = saved.clone();
            return Ok(saved);
        }

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let saved = Reservation::from_draft(ReservationId::new(*next_id), draft);
        reservations.push(saved.clone());
        Ok(saved)
    }

    async fn cancel(&self, id: ReservationId) -> Result<u64, InfraError> {
        self.check()?;
        let mut reservations = self.reservations.lock().unwrap();
        match reservations
            .iter()
            .position(|r| r.id() == id && !r.is_cancelled())
        {
            Some(pos) => {
                reservations[pos] = reservations[pos].clone().cancelled();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn find_by_criteria(
        &self,
        criteria: &ReservationCriteria,
    ) -> Result<Vec<Reservation>, InfraError> {
        self.check()?;
        Ok(self.sorted_by_id(|r| criteria.matches(r)))
    }

    async fn find_all(&self) -> Result<Vec<Reservation>, InfraError> {
        self.check()?;
        Ok(self.sorted_by_id(|_| true))
    }
}

// ===== MockUserRepository =====

#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id() == id)
            .cloned())
    }
}

// ===== MockResourceRepository =====

#[derive(Clone, Default)]
pub struct MockResourceRepository {
    resources: Arc<Mutex<Vec<Resource>>>,
}

impl MockResourceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_resource(&self, resource: Resource) {
        self.resources.lock().unwrap().push(resource);
    }
}

#[async_trait]
impl ResourceRepository for MockResourceRepository {
    async fn find_by_id(&self, id: ResourceId) -> Result<Option<Resource>, InfraError> {
        Ok(self
            .resources
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id() == id)
            .cloned())
    }
}

// ===== MockNotificationSender =====

/// 送信内容を記録するモック
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent: Arc<Mutex<Vec<ReservationEmail>>>,
    fail: bool,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 常に送信失敗を返すモック
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// 送信に成功したペイロード
    pub fn sent_emails(&self) -> Vec<ReservationEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_reservation_email(
        &self,
        email: &ReservationEmail,
    ) -> Result<(), NotificationError> {
        if self.fail {
            return Err(NotificationError::SendFailed("モックの送信失敗".to_string()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
