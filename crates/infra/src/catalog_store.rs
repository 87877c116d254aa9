use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use stockyard_catalog::{Category, Location, Product, ProductSpec, Warehouse, WarehouseSpec};
use stockyard_core::{
    CategoryId, LocationId, ProductId, StockError, StockResult, WarehouseId,
};

#[derive(Debug, Default)]
struct CatalogState {
    products: HashMap<ProductId, Product>,
    warehouses: HashMap<WarehouseId, Warehouse>,
    locations: HashMap<LocationId, Location>,
    categories: HashMap<CategoryId, Category>,
}

/// In-memory store for catalog reference data.
///
/// Enforces the uniqueness rules the domain types cannot see on their own:
/// product SKU, warehouse short code, and category name.
#[derive(Debug, Default)]
pub struct CatalogStore {
    state: RwLock<CatalogState>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_product(&self, spec: ProductSpec) -> StockResult<Product> {
        let mut state = self.write()?;
        if state
            .products
            .values()
            .any(|p| p.sku.eq_ignore_ascii_case(&spec.sku))
        {
            return Err(StockError::conflict(format!(
                "sku {} already exists",
                spec.sku
            )));
        }
        if let Some(category_id) = spec.category_id {
            if !state.categories.contains_key(&category_id) {
                return Err(StockError::NotFound);
            }
        }
        let product = Product::new(ProductId::new(), spec, Utc::now())?;
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    /// Replace a product's attributes, keeping id and creation time.
    pub fn update_product(&self, id: ProductId, spec: ProductSpec) -> StockResult<Product> {
        let mut state = self.write()?;
        let existing = state.products.get(&id).ok_or(StockError::NotFound)?;
        if state
            .products
            .values()
            .any(|p| p.id != id && p.sku.eq_ignore_ascii_case(&spec.sku))
        {
            return Err(StockError::conflict(format!(
                "sku {} already exists",
                spec.sku
            )));
        }
        if let Some(category_id) = spec.category_id {
            if !state.categories.contains_key(&category_id) {
                return Err(StockError::NotFound);
            }
        }
        let updated = Product::new(id, spec, existing.created_at)?;
        state.products.insert(id, updated.clone());
        Ok(updated)
    }

    /// Remove a product. Stock guards live in the service layer, which also
    /// sees the ledger.
    pub fn delete_product(&self, id: ProductId) -> StockResult<Product> {
        self.write()?.products.remove(&id).ok_or(StockError::NotFound)
    }

    pub fn get_product(&self, id: ProductId) -> StockResult<Product> {
        self.read()?.products.get(&id).cloned().ok_or(StockError::NotFound)
    }

    pub fn find_product_by_sku(&self, sku: &str) -> StockResult<Option<Product>> {
        Ok(self
            .read()?
            .products
            .values()
            .find(|p| p.sku.eq_ignore_ascii_case(sku))
            .cloned())
    }

    /// All products, ordered by name.
    pub fn list_products(&self) -> StockResult<Vec<Product>> {
        let state = self.read()?;
        let mut products: Vec<Product> = state.products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    /// Case-insensitive substring search over name and SKU.
    pub fn search_products(&self, query: &str) -> StockResult<Vec<Product>> {
        let needle = query.to_lowercase();
        let state = self.read()?;
        let mut hits: Vec<Product> = state
            .products
            .values()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.sku.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(hits)
    }

    pub fn create_warehouse(&self, spec: WarehouseSpec) -> StockResult<Warehouse> {
        let mut state = self.write()?;
        if let Some(code) = &spec.short_code {
            if state
                .warehouses
                .values()
                .any(|w| w.short_code.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(code)))
            {
                return Err(StockError::conflict(format!(
                    "warehouse short code {code} already exists"
                )));
            }
        }
        let warehouse = Warehouse::new(WarehouseId::new(), spec, Utc::now())?;
        if warehouse.is_default {
            for other in state.warehouses.values_mut() {
                other.is_default = false;
            }
        }
        state.warehouses.insert(warehouse.id, warehouse.clone());
        Ok(warehouse)
    }

    pub fn delete_warehouse(&self, id: WarehouseId) -> StockResult<Warehouse> {
        let mut state = self.write()?;
        if state.locations.values().any(|l| l.warehouse_id == id) {
            return Err(StockError::conflict(
                "warehouse still has locations".to_string(),
            ));
        }
        state.warehouses.remove(&id).ok_or(StockError::NotFound)
    }

    pub fn get_warehouse(&self, id: WarehouseId) -> StockResult<Warehouse> {
        self.read()?
            .warehouses
            .get(&id)
            .cloned()
            .ok_or(StockError::NotFound)
    }

    pub fn warehouse_name(&self, id: WarehouseId) -> Option<String> {
        self.read()
            .ok()
            .and_then(|s| s.warehouses.get(&id).map(|w| w.name.clone()))
    }

    pub fn list_warehouses(&self) -> StockResult<Vec<Warehouse>> {
        let state = self.read()?;
        let mut warehouses: Vec<Warehouse> = state.warehouses.values().cloned().collect();
        warehouses.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(warehouses)
    }

    pub fn default_warehouse(&self) -> StockResult<Option<Warehouse>> {
        Ok(self
            .read()?
            .warehouses
            .values()
            .find(|w| w.is_default)
            .cloned())
    }

    pub fn create_location(
        &self,
        name: String,
        short_code: Option<String>,
        warehouse_id: WarehouseId,
    ) -> StockResult<Location> {
        let mut state = self.write()?;
        if !state.warehouses.contains_key(&warehouse_id) {
            return Err(StockError::NotFound);
        }
        let location = Location::new(LocationId::new(), name, short_code, warehouse_id, Utc::now())?;
        state.locations.insert(location.id, location.clone());
        Ok(location)
    }

    /// Locations, optionally restricted to one warehouse, ordered by name.
    pub fn list_locations(&self, warehouse_id: Option<WarehouseId>) -> StockResult<Vec<Location>> {
        let state = self.read()?;
        let mut locations: Vec<Location> = state
            .locations
            .values()
            .filter(|l| warehouse_id.is_none_or(|w| l.warehouse_id == w))
            .cloned()
            .collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }

    pub fn create_category(&self, name: String) -> StockResult<Category> {
        let mut state = self.write()?;
        if state
            .categories
            .values()
            .any(|c| c.name.eq_ignore_ascii_case(&name))
        {
            return Err(StockError::conflict(format!(
                "category {name} already exists"
            )));
        }
        let category = Category::new(CategoryId::new(), name, Utc::now())?;
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    pub fn delete_category(&self, id: CategoryId) -> StockResult<Category> {
        let mut state = self.write()?;
        if state.products.values().any(|p| p.category_id == Some(id)) {
            return Err(StockError::conflict(
                "category is still referenced by products".to_string(),
            ));
        }
        state.categories.remove(&id).ok_or(StockError::NotFound)
    }

    pub fn list_categories(&self) -> StockResult<Vec<Category>> {
        let state = self.read()?;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    fn read(&self) -> StockResult<RwLockReadGuard<'_, CatalogState>> {
        self.state
            .read()
            .map_err(|_| StockError::storage("catalog lock poisoned"))
    }

    fn write(&self) -> StockResult<RwLockWriteGuard<'_, CatalogState>> {
        self.state
            .write()
            .map_err(|_| StockError::storage("catalog lock poisoned"))
    }
}
