//! # 予約ハンドラ
//!
//! 予約管理の内部 API を提供する。
//!
//! ## エンドポイント
//!
//! - `GET /internal/reservations` - 全予約
//! - `POST /internal/reservations` - 予約の保存（upsert）
//! - `GET /internal/reservations/{id}` - 予約の取得
//! - `POST /internal/reservations/{id}/cancel` - 予約のキャンセル
//! - `POST /internal/reservations/{id}/confirmation` - 予約確認メールの送信依頼
//! - `POST /internal/reservations/search` - 検索条件による絞り込み
//! - `GET /internal/reservations/resource-ids` - 時間帯に含まれる予約のリソース ID
//! - `GET /internal/users/{user_id}/reservations` - ユーザー別の予約一覧

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use roomres_domain::{
    reservation::{
        Reservation,
        ReservationCriteria,
        ReservationDraft,
        ReservationId,
        ReservationScope,
    },
    resource::ResourceId,
    user::UserId,
};
use roomres_shared::ApiResponse;
use serde::{Deserialize, Serialize};

use crate::{error::CoreError, usecase::ReservationUseCaseImpl};

/// 予約 API の共有状態
pub struct ReservationState {
    pub usecase: ReservationUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// 予約保存リクエスト
///
/// `notify` が `true` の場合、保存後に予約確認メールを送る。
#[derive(Debug, Deserialize)]
pub struct SaveReservationRequest {
    #[serde(flatten)]
    pub reservation: ReservationDraft,
    #[serde(default)]
    pub notify:      bool,
}

/// 時間帯クエリパラメータ
#[derive(Debug, Deserialize)]
pub struct TimeWindowQuery {
    pub start: DateTime<Utc>,
    pub end:   DateTime<Utc>,
}

/// 期間区分クエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ScopeQuery {
    #[serde(default)]
    pub scope: ReservationScope,
}

/// 予約 DTO
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReservationDto {
    pub id:          i32,
    pub user_id:     String,
    pub resource_id: i32,
    pub start_time:  DateTime<Utc>,
    pub end_time:    DateTime<Utc>,
    pub cancelled:   bool,
}

impl From<&Reservation> for ReservationDto {
    fn from(reservation: &Reservation) -> Self {
        Self {
            id:          reservation.id().as_i32(),
            user_id:     reservation.user_id().as_str().to_string(),
            resource_id: reservation.resource_id().as_i32(),
            start_time:  reservation.start_time(),
            end_time:    reservation.end_time(),
            cancelled:   reservation.is_cancelled(),
        }
    }
}

/// キャンセル結果
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CancelResponse {
    /// 影響を受けた予約の件数（0 または 1）
    pub cancelled: u64,
}

fn to_dtos(reservations: &[Reservation]) -> Vec<ReservationDto> {
    reservations.iter().map(ReservationDto::from).collect()
}

// --- ハンドラ ---
//
// 抽出失敗も RFC 9457 形式で返すため、`Json` / `Path` / `Query` は
// `WithRejection<_, CoreError>` 経由で受け取る。

/// GET /internal/reservations
#[tracing::instrument(skip_all)]
pub async fn list_reservations(
    State(state): State<Arc<ReservationState>>,
) -> Result<impl IntoResponse, CoreError> {
    let reservations = state.usecase.get_all().await?;

    Ok(Json(ApiResponse::new(to_dtos(&reservations))))
}

/// POST /internal/reservations
///
/// ## レスポンス
///
/// - `201 Created`: 新しい ID で作成した予約（ID なし、または存在しない ID の指定）
/// - `200 OK`: 指定した ID の既存予約を置き換えた
/// - `400 Bad Request`: 時間帯が不正、リソースが存在しない、ボディが不正
/// - `502 Bad Gateway`: `notify` 指定時のメール送信失敗（予約は保存済みで、
///   ボディの `reservation_id` に ID を含める）
#[tracing::instrument(skip_all, fields(notify = req.notify))]
pub async fn save_reservation(
    State(state): State<Arc<ReservationState>>,
    WithRejection(Json(req), _): WithRejection<Json<SaveReservationRequest>, CoreError>,
) -> Result<impl IntoResponse, CoreError> {
    let requested_id = req.reservation.id;

    let saved = state.usecase.save_reservation(req.reservation).await?;

    let status = if requested_id == Some(saved.id()) {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    if req.notify {
        state
            .usecase
            .send_confirmation(saved.id())
            .await
            .map_err(|e| e.after_save(saved.id()))?;
    }

    Ok((status, Json(ApiResponse::new(ReservationDto::from(&saved)))))
}

/// GET /internal/reservations/{id}
#[tracing::instrument(skip_all, fields(%id))]
pub async fn get_reservation(
    State(state): State<Arc<ReservationState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, CoreError>,
) -> Result<impl IntoResponse, CoreError> {
    let reservation = state
        .usecase
        .get_reservation_by_id(ReservationId::new(id))
        .await?;

    Ok(Json(ApiResponse::new(ReservationDto::from(&reservation))))
}

/// POST /internal/reservations/{id}/cancel
///
/// 存在しない、またはキャンセル済みの予約でも `200 OK`（`cancelled: 0`）を返す。
#[tracing::instrument(skip_all, fields(%id))]
pub async fn cancel_reservation(
    State(state): State<Arc<ReservationState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, CoreError>,
) -> Result<impl IntoResponse, CoreError> {
    let cancelled = state
        .usecase
        .cancel_reservation(ReservationId::new(id))
        .await?;

    Ok(Json(ApiResponse::new(CancelResponse { cancelled })))
}

/// POST /internal/reservations/{id}/confirmation
///
/// ## レスポンス
///
/// - `204 No Content`: メールサービスが受け付けた
/// - `404 Not Found`: 予約・予約者・リソースのいずれかが存在しない
/// - `502 Bad Gateway`: メールサービスへの送信失敗
#[tracing::instrument(skip_all, fields(%id))]
pub async fn send_confirmation(
    State(state): State<Arc<ReservationState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, CoreError>,
) -> Result<impl IntoResponse, CoreError> {
    state
        .usecase
        .send_confirmation(ReservationId::new(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /internal/reservations/search
///
/// 指定されたフィールドのみで絞り込む。空のオブジェクトは全件に一致する。
#[tracing::instrument(skip_all)]
pub async fn search_reservations(
    State(state): State<Arc<ReservationState>>,
    WithRejection(Json(criteria), _): WithRejection<Json<ReservationCriteria>, CoreError>,
) -> Result<impl IntoResponse, CoreError> {
    let reservations = state.usecase.get_reservations_by_criteria(&criteria).await?;

    Ok(Json(ApiResponse::new(to_dtos(&reservations))))
}

/// GET /internal/reservations/resource-ids?start=&end=
#[tracing::instrument(skip_all, fields(start = %query.start, end = %query.end))]
pub async fn list_reservation_resource_ids(
    State(state): State<Arc<ReservationState>>,
    WithRejection(Query(query), _): WithRejection<Query<TimeWindowQuery>, CoreError>,
) -> Result<impl IntoResponse, CoreError> {
    let ids: Vec<ResourceId> = state
        .usecase
        .get_reservation_resource_ids(query.start, query.end)
        .await?;

    Ok(Json(ApiResponse::new(ids)))
}

/// GET /internal/users/{user_id}/reservations?scope=all|upcoming|past
#[tracing::instrument(skip_all, fields(%user_id, scope = %query.scope))]
pub async fn list_user_reservations(
    State(state): State<Arc<ReservationState>>,
    WithRejection(Path(user_id), _): WithRejection<Path<String>, CoreError>,
    WithRejection(Query(query), _): WithRejection<Query<ScopeQuery>, CoreError>,
) -> Result<impl IntoResponse, CoreError> {
    let reservations = state
        .usecase
        .get_reservations_by_scope(&UserId::new(user_id), query.scope)
        .await?;

    Ok(Json(ApiResponse::new(to_dtos(&reservations))))
}
