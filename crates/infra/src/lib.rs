//! # RoomRes Infrastructure
//!
//! 外部システムとの接続を担当するインフラ層。
//!
//! ## モジュール構成
//!
//! - [`db`]: PostgreSQL 接続プールとマイグレーション
//! - [`error`]: インフラ層エラー
//! - [`repository`]: 予約・ユーザー・リソースのリポジトリ
//! - [`notification`]: 予約確認メールの送信
//! - `mock`: テスト用インメモリモック（`test-utils` feature）

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;
pub mod repository;

pub use error::InfraError;
