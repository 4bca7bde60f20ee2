//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するシードデータと時刻ヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use roomres_domain::{resource::ResourceId, user::UserId};
use sqlx::PgPool;

/// シードデータのユーザー
pub fn alice() -> UserId {
    UserId::new("alice")
}

pub fn bob() -> UserId {
    UserId::new("bob")
}

/// テストの基準時刻（2026-01-05 09:00:00 UTC）
pub fn test_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_767_603_600, 0).unwrap()
}

/// 基準時刻から `hours` 時間ずらした時刻
pub fn hours(hours: i64) -> DateTime<Utc> {
    test_now() + Duration::hours(hours)
}

/// 建物 1 件、リソース 2 件、ユーザー 2 件を投入し、リソース ID を返す
pub async fn setup_test_data(pool: &PgPool) -> (ResourceId, ResourceId) {
    let building_id: i32 =
        sqlx::query_scalar("INSERT INTO buildings (name) VALUES ('Reston HQ') RETURNING id")
            .fetch_one(pool)
            .await
            .expect("建物の作成に失敗");

    let mut resource_ids = Vec::new();
    for name in ["Room 101", "Room 102"] {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO resources (building_id, name) VALUES ($1, $2) RETURNING id",
        )
        .bind(building_id)
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("リソースの作成に失敗");
        resource_ids.push(ResourceId::new(id));
    }

    for (id, email, name) in [
        ("alice", "alice@example.com", "Alice"),
        ("bob", "bob@example.com", "Bob"),
    ] {
        sqlx::query("INSERT INTO users (id, email, name) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(email)
            .bind(name)
            .execute(pool)
            .await
            .expect("ユーザーの作成に失敗");
    }

    (resource_ids[0], resource_ids[1])
}
