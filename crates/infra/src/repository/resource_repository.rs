//! # ResourceRepository
//!
//! 予約対象リソースの読み取りを担当するリポジトリ。
//! 所属する建物は JOIN で一括取得する。

use async_trait::async_trait;
use roomres_domain::resource::{Building, BuildingId, Resource, ResourceId};
use sqlx::PgPool;

use crate::error::InfraError;

/// リソースリポジトリトレイト
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// ID でリソースを建物付きで検索
    async fn find_by_id(&self, id: ResourceId) -> Result<Option<Resource>, InfraError>;
}

#[derive(Debug, sqlx::FromRow)]
struct ResourceRow {
    id:            i32,
    name:          String,
    building_id:   i32,
    building_name: String,
}

impl From<ResourceRow> for Resource {
    fn from(row: ResourceRow) -> Self {
        Resource::new(
            ResourceId::new(row.id),
            row.name,
            Building {
                id:   BuildingId::new(row.building_id),
                name: row.building_name,
            },
        )
    }
}

/// PostgreSQL 実装の ResourceRepository
#[derive(Debug, Clone)]
pub struct PostgresResourceRepository {
    pool: PgPool,
}

impl PostgresResourceRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceRepository for PostgresResourceRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: ResourceId) -> Result<Option<Resource>, InfraError> {
        let row = sqlx::query_as::<_, ResourceRow>(
            r#"
            SELECT
                r.id,
                r.name,
                b.id AS building_id,
                b.name AS building_name
            FROM resources r
            INNER JOIN buildings b ON b.id = r.building_id
            WHERE r.id = $1
            "#,
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Resource::from))
    }
}
