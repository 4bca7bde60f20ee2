//! # 予約
//!
//! リソース（会議室など）をユーザーが一定の時間帯だけ確保する「予約」を表現する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`Reservation`] | 予約 | 永続化済みの予約 |
//! | [`ReservationDraft`] | 予約の保存要求 | ID の有無で新規作成 / 置き換えを切り替える |
//! | [`ReservationCriteria`] | 検索条件 | 指定されたフィールドのみで絞り込む |
//! | [`ReservationScope`] | 期間区分 | 全件 / 今後 / 過去 |
//!
//! ## 時間帯の扱い
//!
//! `start_time < end_time` はストア側の CHECK 制約で保証する。
//! ドメイン層では検証しない。
//!
//! ## 使用例
//!
//! ```rust
//! use chrono::{DateTime, Utc};
//! use roomres_domain::{
//!     reservation::{ReservationCriteria, ReservationDraft},
//!     resource::ResourceId,
//!     user::UserId,
//! };
//!
//! let draft = ReservationDraft::new(
//!     UserId::new("alice"),
//!     ResourceId::new(3),
//!     DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
//!     DateTime::from_timestamp(1_700_003_600, 0).unwrap(),
//! );
//! assert!(draft.id.is_none());
//!
//! let criteria = ReservationCriteria::new().user_id(UserId::new("alice"));
//! assert!(!criteria.is_empty());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{resource::ResourceId, user::UserId};

define_int_id! {
    /// 予約の一意識別子（DB の SERIAL 主キー）
    pub struct ReservationId;
}

/// 予約エンティティ生成用パラメータ
pub struct NewReservation {
    pub id:          ReservationId,
    pub user_id:     UserId,
    pub resource_id: ResourceId,
    pub start_time:  DateTime<Utc>,
    pub end_time:    DateTime<Utc>,
    pub cancelled:   bool,
}

/// 予約エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    id:          ReservationId,
    user_id:     UserId,
    resource_id: ResourceId,
    start_time:  DateTime<Utc>,
    end_time:    DateTime<Utc>,
    cancelled:   bool,
}

impl Reservation {
    pub fn new(params: NewReservation) -> Self {
        Self {
            id:          params.id,
            user_id:     params.user_id,
            resource_id: params.resource_id,
            start_time:  params.start_time,
            end_time:    params.end_time,
            cancelled:   params.cancelled,
        }
    }

    /// 保存要求と採番済み ID から予約を組み立てる
    pub fn from_draft(id: ReservationId, draft: ReservationDraft) -> Self {
        Self {
            id,
            user_id: draft.user_id,
            resource_id: draft.resource_id,
            start_time: draft.start_time,
            end_time: draft.end_time,
            cancelled: draft.cancelled,
        }
    }

    /// キャンセル済みの予約を返す
    pub fn cancelled(self) -> Self {
        Self {
            cancelled: true,
            ..self
        }
    }

    /// `now` より後に開始する、キャンセルされていない予約か
    pub fn is_upcoming_at(&self, now: DateTime<Utc>) -> bool {
        !self.cancelled && self.start_time > now
    }

    /// `now` より前に終了した、キャンセルされていない予約か
    pub fn is_past_at(&self, now: DateTime<Utc>) -> bool {
        !self.cancelled && self.end_time < now
    }

    /// 時間帯が `(start, end)` に厳密に含まれるか
    ///
    /// 重なり判定ではない。境界と一致する予約は含まれない。
    pub fn is_strictly_within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time > start && self.end_time < end
    }

    // --- ゲッター ---

    pub fn id(&self) -> ReservationId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn resource_id(&self) -> ResourceId {
        self.resource_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// 予約の保存要求
///
/// - `id` が `None`: 新規作成（ID はストアが採番）
/// - `id` が `Some`: その ID の予約を置き換える（存在しなければ新しい ID で作成）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDraft {
    pub id:          Option<ReservationId>,
    pub user_id:     UserId,
    pub resource_id: ResourceId,
    pub start_time:  DateTime<Utc>,
    pub end_time:    DateTime<Utc>,
    #[serde(default)]
    pub cancelled:   bool,
}

impl ReservationDraft {
    /// 新規作成用の保存要求を作る
    pub fn new(
        user_id: UserId,
        resource_id: ResourceId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            user_id,
            resource_id,
            start_time,
            end_time,
            cancelled: false,
        }
    }

    /// 既存の ID を指定する（置き換え）
    pub fn with_id(self, id: ReservationId) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }
}

impl From<&Reservation> for ReservationDraft {
    fn from(reservation: &Reservation) -> Self {
        Self {
            id:          Some(reservation.id),
            user_id:     reservation.user_id.clone(),
            resource_id: reservation.resource_id,
            start_time:  reservation.start_time,
            end_time:    reservation.end_time,
            cancelled:   reservation.cancelled,
        }
    }
}

/// 予約の検索条件
///
/// `Some` のフィールドだけが一致条件になる（すべて AND、完全一致）。
/// 全フィールドが `None` の場合は全件にマッチする。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationCriteria {
    pub id:          Option<ReservationId>,
    pub user_id:     Option<UserId>,
    pub resource_id: Option<ResourceId>,
    pub start_time:  Option<DateTime<Utc>>,
    pub end_time:    Option<DateTime<Utc>>,
    pub cancelled:   Option<bool>,
}

impl ReservationCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: ReservationId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn resource_id(mut self, resource_id: ResourceId) -> Self {
        self.resource_id = Some(resource_id);
        self
    }

    pub fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn cancelled(mut self, cancelled: bool) -> Self {
        self.cancelled = Some(cancelled);
        self
    }

    /// 条件が 1 つも指定されていないか
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// 予約が条件に一致するか
    pub fn matches(&self, reservation: &Reservation) -> bool {
        self.id.is_none_or(|id| reservation.id == id)
            && self
                .user_id
                .as_ref()
                .is_none_or(|user_id| &reservation.user_id == user_id)
            && self
                .resource_id
                .is_none_or(|resource_id| reservation.resource_id == resource_id)
            && self
                .start_time
                .is_none_or(|start| reservation.start_time == start)
            && self.end_time.is_none_or(|end| reservation.end_time == end)
            && self
                .cancelled
                .is_none_or(|cancelled| reservation.cancelled == cancelled)
    }
}

/// ユーザー別予約一覧の期間区分
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReservationScope {
    /// キャンセル済みを含む全件
    #[default]
    All,
    /// 開始時刻が現在より後
    Upcoming,
    /// 終了時刻が現在より前
    Past,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn make_reservation(start: i64, end: i64) -> Reservation {
        Reservation::new(NewReservation {
            id:          ReservationId::new(1),
            user_id:     UserId::new("alice"),
            resource_id: ResourceId::new(10),
            start_time:  at(start),
            end_time:    at(end),
            cancelled:   false,
        })
    }

    #[rstest]
    #[case(100, 200, true, false)]
    #[case(-200, -100, false, true)]
    #[case(-100, 100, false, false)]
    #[case(0, 100, false, false)]
    fn test_今後と過去の判定は現在時刻に対して排他的(
        #[case] start: i64,
        #[case] end: i64,
        #[case] upcoming: bool,
        #[case] past: bool,
    ) {
        let reservation = make_reservation(start, end);
        let now = at(0);

        assert_eq!(reservation.is_upcoming_at(now), upcoming);
        assert_eq!(reservation.is_past_at(now), past);
        assert!(!(reservation.is_upcoming_at(now) && reservation.is_past_at(now)));
    }

    #[test]
    fn test_キャンセル済みの予約は今後にも過去にも含まれない() {
        let upcoming = make_reservation(100, 200).cancelled();
        let past = make_reservation(-200, -100).cancelled();

        assert!(!upcoming.is_upcoming_at(at(0)));
        assert!(!past.is_past_at(at(0)));
    }

    #[rstest]
    #[case(10, 20, true)]
    #[case(0, 20, false)]
    #[case(10, 30, false)]
    #[case(-10, 40, false)]
    fn test_時間帯の包含判定は境界を含まない(
        #[case] start: i64,
        #[case] end: i64,
        #[case] expected: bool,
    ) {
        let reservation = make_reservation(start, end);

        assert_eq!(reservation.is_strictly_within(at(0), at(30)), expected);
    }

    #[test]
    fn test_空の検索条件はすべての予約に一致する() {
        let criteria = ReservationCriteria::new();

        assert!(criteria.is_empty());
        assert!(criteria.matches(&make_reservation(0, 10)));
    }

    #[test]
    fn test_検索条件は指定されたフィールドのみで絞り込む() {
        let reservation = make_reservation(0, 10);

        assert!(
            ReservationCriteria::new()
                .user_id(UserId::new("alice"))
                .matches(&reservation)
        );
        assert!(
            !ReservationCriteria::new()
                .user_id(UserId::new("bob"))
                .matches(&reservation)
        );
        assert!(
            ReservationCriteria::new()
                .resource_id(ResourceId::new(10))
                .start_time(at(0))
                .cancelled(false)
                .matches(&reservation)
        );
        assert!(
            !ReservationCriteria::new()
                .resource_id(ResourceId::new(10))
                .end_time(at(11))
                .matches(&reservation)
        );
    }

    #[test]
    fn test_検索条件はjsonの欠落フィールドをnoneとして扱う() {
        let criteria: ReservationCriteria =
            serde_json::from_str(r#"{"user_id": "alice"}"#).unwrap();

        assert_eq!(
            criteria,
            ReservationCriteria::new().user_id(UserId::new("alice"))
        );
    }

    #[test]
    fn test_保存要求は予約から置き換え用に作れる() {
        let reservation = make_reservation(0, 10);
        let draft = ReservationDraft::from(&reservation);

        assert_eq!(draft.id, Some(ReservationId::new(1)));
        assert_eq!(Reservation::from_draft(ReservationId::new(1), draft), reservation);
    }

    #[test]
    fn test_期間区分の文字列変換() {
        assert_eq!(ReservationScope::Upcoming.to_string(), "upcoming");
        assert_eq!(
            ReservationScope::from_str("past").unwrap(),
            ReservationScope::Past
        );
        assert!(ReservationScope::from_str("future").is_err());
    }
}
