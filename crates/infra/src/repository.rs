//! # リポジトリ実装
//!
//! 予約・ユーザー・リソースの永続化トレイトと PostgreSQL 実装を提供する。
//!
//! ## 設計方針
//!
//! - **トレイト経由で利用**: ユースケース層は `Arc<dyn XxxRepository>` として保持する
//! - **実行時クエリ**: `sqlx::query_as` と `QueryBuilder` で組み立て、行は `FromRow` で受ける

pub mod reservation_repository;
pub mod resource_repository;
pub mod user_repository;

pub use reservation_repository::{PostgresReservationRepository, ReservationRepository};
pub use resource_repository::{PostgresResourceRepository, ResourceRepository};
pub use user_repository::{PostgresUserRepository, UserRepository};
