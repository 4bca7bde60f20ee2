//! # RoomRes ドメイン層
//!
//! 会議室・設備予約のドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（例: Reservation, Resource）
//! - **値オブジェクト**: 識別子を持たない不変オブジェクト（例: Email, ReservationCriteria）
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! apps → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、メールサービス）には一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`clock`] - 現在時刻の抽象化
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`notification`] - 予約確認メールのペイロード
//! - [`reservation`] - 予約エンティティと検索条件
//! - [`resource`] - 予約対象（会議室など）と建物
//! - [`user`] - 予約者
//!
//! ## 使用例
//!
//! ```rust
//! use roomres_domain::{DomainError, reservation::ReservationId};
//!
//! let id = ReservationId::new(42);
//!
//! let error = DomainError::NotFound {
//!     entity_type: "Reservation",
//!     id:          id.to_string(),
//! };
//! assert_eq!(error.to_string(), "Reservation が見つかりません: 42");
//! ```

#[macro_use]
mod macros;

pub mod clock;
pub mod error;
pub mod notification;
pub mod reservation;
pub mod resource;
pub mod user;

pub use error::DomainError;
