use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockyard_core::{CategoryId, LocationId, StockError, StockResult, WarehouseId};

/// Catalog entity: Warehouse.
///
/// Stock is partitioned per warehouse; a product may hold independent
/// quantities in several of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub name: String,
    /// Short display code shown in references and pickers. Unique when set.
    pub short_code: Option<String>,
    pub address: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseSpec {
    pub name: String,
    pub short_code: Option<String>,
    pub address: Option<String>,
    pub is_default: bool,
}

impl Warehouse {
    pub fn new(id: WarehouseId, spec: WarehouseSpec, now: DateTime<Utc>) -> StockResult<Self> {
        if spec.name.trim().is_empty() {
            return Err(StockError::validation("warehouse name cannot be empty"));
        }
        Ok(Self {
            id,
            name: spec.name,
            short_code: spec.short_code,
            address: spec.address,
            is_default: spec.is_default,
            created_at: now,
        })
    }
}

/// Catalog entity: Location, a named spot inside a warehouse.
///
/// Inert metadata only: quantities are tracked per warehouse, never per
/// location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub short_code: Option<String>,
    pub warehouse_id: WarehouseId,
    pub created_at: DateTime<Utc>,
}

impl Location {
    pub fn new(
        id: LocationId,
        name: String,
        short_code: Option<String>,
        warehouse_id: WarehouseId,
        now: DateTime<Utc>,
    ) -> StockResult<Self> {
        if name.trim().is_empty() {
            return Err(StockError::validation("location name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            short_code,
            warehouse_id,
            created_at: now,
        })
    }
}

/// Catalog entity: Category. Products reference it optionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(id: CategoryId, name: String, now: DateTime<Utc>) -> StockResult<Self> {
        if name.trim().is_empty() {
            return Err(StockError::validation("category name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            created_at: now,
        })
    }
}
