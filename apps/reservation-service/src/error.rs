//! # Reservation Service エラー定義
//!
//! Reservation Service 固有のエラーと、HTTP レスポンスへの変換を定義する。

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roomres_domain::{DomainError, notification::NotificationError, reservation::ReservationId};
use roomres_shared::{ErrorResponse, event_log::error as log_error};
use serde::Serialize;
use thiserror::Error;

/// Reservation Service で発生するエラー
#[derive(Debug, Error)]
pub enum CoreError {
    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 不正なリクエスト
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// データベースエラー
    #[error("データベースエラー: {0}")]
    Database(#[from] roomres_infra::InfraError),

    /// メールサービスへの送信失敗
    #[error("通知エラー: {0}")]
    Notification(#[from] NotificationError),

    /// 予約は保存されたが、確認メールの送信に失敗
    ///
    /// レスポンスボディに保存済みの予約 ID（`reservation_id`）を含める。
    #[error("予約 {reservation_id} は保存済み、通知エラー: {source}")]
    NotificationAfterSave {
        reservation_id: ReservationId,
        #[source]
        source:         NotificationError,
    },
}

/// RFC 9457 の拡張メンバーとして保存済みの予約 ID を付けたエラーボディ
#[derive(Debug, Serialize)]
struct SavedReservationProblem {
    #[serde(flatten)]
    problem:        ErrorResponse,
    reservation_id: i32,
}

impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        CoreError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for CoreError {
    fn from(rejection: QueryRejection) -> Self {
        CoreError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for CoreError {
    fn from(rejection: PathRejection) -> Self {
        CoreError::BadRequest(rejection.body_text())
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(_) => CoreError::BadRequest(err.to_string()),
            DomainError::NotFound { .. } => CoreError::NotFound(err.to_string()),
        }
    }
}

impl CoreError {
    /// 保存後の通知失敗であれば、保存済みの予約 ID を付ける
    pub fn after_save(self, reservation_id: ReservationId) -> Self {
        match self {
            CoreError::Notification(source) => CoreError::NotificationAfterSave {
                reservation_id,
                source,
            },
            other => other,
        }
    }

    /// HTTP ステータスコード
    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CoreError::Notification(_) | CoreError::NotificationAfterSave { .. } => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let body = match &self {
            CoreError::NotFound(msg) => ErrorResponse::not_found(msg.clone()),
            CoreError::BadRequest(msg) => ErrorResponse::bad_request(msg.clone()),
            CoreError::Database(e) => {
                tracing::error!(
                    error.category = log_error::category::INFRASTRUCTURE,
                    error.kind = log_error::kind::DATABASE,
                    span_trace = %e.span_trace(),
                    "データベースエラー: {}",
                    e
                );
                ErrorResponse::internal_error()
            }
            CoreError::Notification(e) => {
                tracing::error!(
                    error.category = log_error::category::EXTERNAL_SERVICE,
                    error.kind = log_error::kind::EMAIL_SERVICE,
                    "通知エラー: {}",
                    e
                );
                ErrorResponse::bad_gateway(e.to_string())
            }
            CoreError::NotificationAfterSave {
                reservation_id,
                source,
            } => {
                tracing::error!(
                    error.category = log_error::category::EXTERNAL_SERVICE,
                    error.kind = log_error::kind::EMAIL_SERVICE,
                    reservation_id = reservation_id.as_i32(),
                    "保存後の通知エラー: {}",
                    source
                );
                let body = SavedReservationProblem {
                    problem:        ErrorResponse::bad_gateway(source.to_string()),
                    reservation_id: reservation_id.as_i32(),
                };
                return (self.status(), Json(body)).into_response();
            }
        };

        (self.status(), Json(body)).into_response()
    }
}
