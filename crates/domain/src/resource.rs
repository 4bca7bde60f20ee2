//! # リソース（予約対象）
//!
//! 会議室などの予約可能な設備と、それが属する建物。
//! このサービスからは読み取り専用。

use serde::{Deserialize, Serialize};

define_int_id! {
    /// リソースの一意識別子
    pub struct ResourceId;
}

define_int_id! {
    /// 建物の一意識別子
    pub struct BuildingId;
}

/// 建物
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub id:   BuildingId,
    pub name: String,
}

/// リソースエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    id:       ResourceId,
    name:     String,
    building: Building,
}

impl Resource {
    pub fn new(id: ResourceId, name: impl Into<String>, building: Building) -> Self {
        Self {
            id,
            name: name.into(),
            building,
        }
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn building(&self) -> &Building {
        &self.building
    }
}
