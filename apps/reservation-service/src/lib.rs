//! # Reservation Service ライブラリ
//!
//! 予約管理の内部 API（ユースケース・ハンドラ・ルーティング）を公開する。

pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use handler::{
    ReservationState,
    cancel_reservation,
    get_reservation,
    health_check,
    list_reservation_resource_ids,
    list_reservations,
    list_user_reservations,
    save_reservation,
    search_reservations,
    send_confirmation,
};

/// ルーティングを組み立てる
///
/// `/internal/reservations/search` と `/internal/reservations/resource-ids` は
/// 静的セグメントとして `{id}` より優先してマッチする。
pub fn router(state: Arc<ReservationState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/internal/reservations",
            get(list_reservations).post(save_reservation),
        )
        .route("/internal/reservations/search", post(search_reservations))
        .route(
            "/internal/reservations/resource-ids",
            get(list_reservation_resource_ids),
        )
        .route("/internal/reservations/{id}", get(get_reservation))
        .route(
            "/internal/reservations/{id}/cancel",
            post(cancel_reservation),
        )
        .route(
            "/internal/reservations/{id}/confirmation",
            post(send_confirmation),
        )
        .route(
            "/internal/users/{user_id}/reservations",
            get(list_user_reservations),
        )
        .with_state(state)
}
