//! # RoomRes 共有ユーティリティ
//!
//! サービスとインフラ層で共通利用するレスポンス型とログ基盤を提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum などフレームワークへの依存は持たない（`IntoResponse` 変換は各サービスの責務）
//! - トレーシング初期化は `observability` feature の背後に置く

pub mod api_response;
pub mod error_response;
pub mod event_log;
pub mod health;
pub mod observability;

pub use api_response::ApiResponse;
pub use error_response::ErrorResponse;
pub use health::HealthResponse;
