//! # ReservationRepository
//!
//! 予約の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **保存は upsert**: ID なしは INSERT、ID ありは UPDATE。指定 ID の行がなければ
//!   新しい ID で INSERT する
//! - **キャンセルは論理削除**: `cancelled = TRUE` に更新し、影響行数を返す。
//!   既にキャンセル済みの予約は更新対象外なので 2 回目は 0 を返す
//! - **今後 / 過去の一覧はキャンセル済みを含まない**。全件系（ユーザー別、全件、ID 指定）は含む
//! - **検索条件は `QueryBuilder` で組み立てる**: 指定されたフィールドのみ WHERE 句に追加

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roomres_domain::{
    reservation::{
        NewReservation,
        Reservation,
        ReservationCriteria,
        ReservationDraft,
        ReservationId,
    },
    resource::ResourceId,
    user::UserId,
};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::InfraError;

/// 予約リポジトリトレイト
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// ユーザーの全予約を ID 順で取得する
    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Vec<Reservation>, InfraError>;

    /// ユーザーの予約のうち `now` より後に開始するものを開始時刻順で取得する
    async fn find_upcoming_by_user_id(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Reservation>, InfraError>;

    /// ユーザーの予約のうち `now` より前に終了したものを開始時刻の新しい順で取得する
    async fn find_past_by_user_id(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Reservation>, InfraError>;

    /// ID で予約を検索する
    async fn find_by_id(&self, id: ReservationId) -> Result<Option<Reservation>, InfraError>;

    /// 時間帯 `(start, end)` に厳密に含まれる予約のリソース ID を取得する
    ///
    /// 重なり判定ではなく `start_time > start AND end_time < end`。
    /// 重複は除き、昇順で返す。
    async fn find_resource_ids_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ResourceId>, InfraError>;

    /// 予約を保存する（upsert）
    async fn save(&self, draft: ReservationDraft) -> Result<Reservation, InfraError>;

    /// 予約をキャンセルし、影響行数を返す
    async fn cancel(&self, id: ReservationId) -> Result<u64, InfraError>;

    /// 検索条件に一致する予約を ID 順で取得する
    async fn find_by_criteria(
        &self,
        criteria: &ReservationCriteria,
    ) -> Result<Vec<Reservation>, InfraError>;

    /// 全予約を ID 順で取得する
    async fn find_all(&self) -> Result<Vec<Reservation>, InfraError>;
}

/// `reservations` テーブルの行
#[derive(Debug, sqlx::FromRow)]
struct ReservationRow {
    id:          i32,
    user_id:     String,
    resource_id: i32,
    start_time:  DateTime<Utc>,
    end_time:    DateTime<Utc>,
    cancelled:   bool,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Reservation::new(NewReservation {
            id:          ReservationId::new(row.id),
            user_id:     UserId::new(row.user_id),
            resource_id: ResourceId::new(row.resource_id),
            start_time:  row.start_time,
            end_time:    row.end_time,
            cancelled:   row.cancelled,
        })
    }
}

const SELECT_RESERVATIONS: &str = r#"
    SELECT id, user_id, resource_id, start_time, end_time, cancelled
    FROM reservations
"#;

/// PostgreSQL 実装の ReservationRepository
#[derive(Debug, Clone)]
pub struct PostgresReservationRepository {
    pool: PgPool,
}

impl PostgresReservationRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, draft: &ReservationDraft) -> Result<Reservation, InfraError> {
        let row = sqlx::query_as::<_, ReservationRow>(
            r#"
            INSERT INTO reservations (user_id, resource_id, start_time, end_time, cancelled)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, resource_id, start_time, end_time, cancelled
            "#,
        )
        .bind(draft.user_id.as_str())
        .bind(draft.resource_id.as_i32())
        .bind(draft.start_time)
        .bind(draft.end_time)
        .bind(draft.cancelled)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}

#[async_trait]
impl ReservationRepository for PostgresReservationRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Vec<Reservation>, InfraError> {
        let rows = sqlx::query_as::<_, ReservationRow>(&format!(
            "{SELECT_RESERVATIONS} WHERE user_id = $1 ORDER BY id ASC"
        ))
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%user_id, %now))]
    async fn find_upcoming_by_user_id(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Reservation>, InfraError> {
        let rows = sqlx::query_as::<_, ReservationRow>(&format!(
            r#"{SELECT_RESERVATIONS}
            WHERE user_id = $1 AND start_time > $2 AND cancelled = FALSE
            ORDER BY start_time ASC, id ASC"#
        ))
        .bind(user_id.as_str())
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%user_id, %now))]
    async fn find_past_by_user_id(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Reservation>, InfraError> {
        let rows = sqlx::query_as::<_, ReservationRow>(&format!(
            r#"{SELECT_RESERVATIONS}
            WHERE user_id = $1 AND end_time < $2 AND cancelled = FALSE
            ORDER BY start_time DESC, id DESC"#
        ))
        .bind(user_id.as_str())
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: ReservationId) -> Result<Option<Reservation>, InfraError> {
        let row = sqlx::query_as::<_, ReservationRow>(&format!(
            "{SELECT_RESERVATIONS} WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Reservation::from))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%start, %end))]
    async fn find_resource_ids_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ResourceId>, InfraError> {
        let ids = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT DISTINCT resource_id
            FROM reservations
            WHERE start_time > $1 AND end_time < $2 AND cancelled = FALSE
            ORDER BY resource_id ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(ResourceId::new).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = ?draft.id))]
    async fn save(&self, draft: ReservationDraft) -> Result<Reservation, InfraError> {
        let Some(id) = draft.id else {
            return self.insert(&draft).await;
        };

        let updated = sqlx::query_as::<_, ReservationRow>(
            r#"
            UPDATE reservations
            SET user_id = $2, resource_id = $3, start_time = $4, end_time = $5, cancelled = $6
            WHERE id = $1
            RETURNING id, user_id, resource_id, start_time, end_time, cancelled
            "#,
        )
        .bind(id.as_i32())
        .bind(draft.user_id.as_str())
        .bind(draft.resource_id.as_i32())
        .bind(draft.start_time)
        .bind(draft.end_time)
        .bind(draft.cancelled)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(row) => Ok(row.into()),
            None => self.insert(&draft).await,
        }
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn cancel(&self, id: ReservationId) -> Result<u64, InfraError> {
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET cancelled = TRUE
            WHERE id = $1 AND cancelled = FALSE
            "#,
        )
        .bind(id.as_i32())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_by_criteria(
        &self,
        criteria: &ReservationCriteria,
    ) -> Result<Vec<Reservation>, InfraError> {
        let mut builder = criteria_query(criteria);
        let rows = builder
            .build_query_as::<ReservationRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Reservation>, InfraError> {
        let rows = sqlx::query_as::<_, ReservationRow>(&format!(
            "{SELECT_RESERVATIONS} ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }
}

/// 検索条件から SELECT 文を組み立てる
///
/// 指定されたフィールドだけを `AND` で連結する。条件がなければ WHERE 句を付けない。
fn criteria_query(criteria: &ReservationCriteria) -> QueryBuilder<'_, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new(SELECT_RESERVATIONS);
    let mut has_condition = false;

    if let Some(id) = criteria.id {
        push_keyword(&mut builder, &mut has_condition);
        builder.push("id = ").push_bind(id.as_i32());
    }
    if let Some(user_id) = &criteria.user_id {
        push_keyword(&mut builder, &mut has_condition);
        builder.push("user_id = ").push_bind(user_id.as_str());
    }
    if let Some(resource_id) = criteria.resource_id {
        push_keyword(&mut builder, &mut has_condition);
        builder.push("resource_id = ").push_bind(resource_id.as_i32());
    }
    if let Some(start_time) = criteria.start_time {
        push_keyword(&mut builder, &mut has_condition);
        builder.push("start_time = ").push_bind(start_time);
    }
    if let Some(end_time) = criteria.end_time {
        push_keyword(&mut builder, &mut has_condition);
        builder.push("end_time = ").push_bind(end_time);
    }
    if let Some(cancelled) = criteria.cancelled {
        push_keyword(&mut builder, &mut has_condition);
        builder.push("cancelled = ").push_bind(cancelled);
    }

    builder.push(" ORDER BY id ASC");
    builder
}

fn push_keyword(builder: &mut QueryBuilder<'_, Postgres>, has_condition: &mut bool) {
    builder.push(if *has_condition { " AND " } else { " WHERE " });
    *has_condition = true;
}
