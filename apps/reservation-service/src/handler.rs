//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ビジネスロジックはユースケースに委譲

pub mod health;
pub mod reservation;

pub use health::health_check;
pub use reservation::{
    ReservationState,
    cancel_reservation,
    get_reservation,
    list_reservation_resource_ids,
    list_reservations,
    list_user_reservations,
    save_reservation,
    search_reservations,
    send_confirmation,
};
