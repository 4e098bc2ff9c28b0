//! Asset reference catalog
//!
//! Static reference data mapping an asset id to its name, class and unit
//! price. Seeded once (`folio init`), read-only afterwards. Every decode of
//! a stored portfolio re-resolves prices from here, so a re-seed with new
//! prices retroactively reprices stored holdings (see DESIGN.md).

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::LedgerError;
use crate::store::KvStore;

/// One catalog entry. Field names mirror the stored hash record
/// (`asset_id_{id}` with fields `id`, `name`, `price`, `class`), which is
/// also the shape of seed JSON files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetType {
    pub id: u32,
    pub name: String,
    #[serde(rename = "class")]
    pub asset_class: String,
    #[serde(rename = "price")]
    pub unit_price: Decimal,
}

fn asset_key(asset_id: u32) -> String {
    format!("asset_id_{asset_id}")
}

/// Read side of the catalog, plus startup seeding.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn KvStore>,
}

impl Catalog {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Resolve an asset id. Absent ids are a user error
    /// ([`LedgerError::UnknownAssetType`]); an entry with missing fields or
    /// a non-positive/unparsable price is reported as corrupt instead of
    /// being silently skipped.
    pub async fn lookup(&self, asset_id: u32) -> Result<AssetType, LedgerError> {
        let key = asset_key(asset_id);

        let Some(name) = self.store.hget(&key, "name").await? else {
            return Err(LedgerError::UnknownAssetType(asset_id));
        };
        let price = self
            .store
            .hget(&key, "price")
            .await?
            .ok_or(LedgerError::CorruptCatalog(asset_id))?;
        let asset_class = self
            .store
            .hget(&key, "class")
            .await?
            .ok_or(LedgerError::CorruptCatalog(asset_id))?;

        let unit_price: Decimal = price
            .parse()
            .map_err(|_| LedgerError::CorruptCatalog(asset_id))?;
        if unit_price <= Decimal::ZERO {
            return Err(LedgerError::CorruptCatalog(asset_id));
        }

        Ok(AssetType {
            id: asset_id,
            name,
            asset_class,
            unit_price,
        })
    }

    /// Write catalog entries. Entries with a non-positive price are rejected
    /// before anything is written.
    pub async fn seed(&self, entries: &[AssetType]) -> Result<(), LedgerError> {
        for entry in entries {
            if entry.unit_price <= Decimal::ZERO {
                return Err(LedgerError::CorruptCatalog(entry.id));
            }
        }

        for entry in entries {
            let id = entry.id.to_string();
            let price = entry.unit_price.to_string();
            self.store
                .hset(
                    &asset_key(entry.id),
                    &[
                        ("id", id.as_str()),
                        ("name", entry.name.as_str()),
                        ("price", price.as_str()),
                        ("class", entry.asset_class.as_str()),
                    ],
                )
                .await?;
        }

        info!(count = entries.len(), "seeded asset catalog");
        Ok(())
    }
}

/// The reference assets the original deployment shipped with.
pub fn default_assets() -> Vec<AssetType> {
    vec![
        AssetType {
            id: 0,
            name: "gold".to_string(),
            asset_class: "commodity".to_string(),
            unit_price: Decimal::new(1286_59, 2),
        },
        AssetType {
            id: 1,
            name: "NYC real estate index".to_string(),
            asset_class: "real-estate".to_string(),
            unit_price: Decimal::new(16255_18, 2),
        },
        AssetType {
            id: 2,
            name: "brent crude oil".to_string(),
            asset_class: "commodity".to_string(),
            unit_price: Decimal::new(51_45, 2),
        },
        AssetType {
            id: 3,
            name: "US 10Y T-Note".to_string(),
            asset_class: "fixed income".to_string(),
            unit_price: Decimal::new(130_77, 2),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use rust_decimal_macros::dec;

    fn catalog() -> (Arc<MemoryStore>, Catalog) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), Catalog::new(store))
    }

    #[tokio::test]
    async fn test_seed_and_lookup() {
        let (_, catalog) = catalog();
        catalog.seed(&default_assets()).await.unwrap();

        let gold = catalog.lookup(0).await.unwrap();
        assert_eq!(gold.name, "gold");
        assert_eq!(gold.asset_class, "commodity");
        assert_eq!(gold.unit_price, dec!(1286.59));

        let note = catalog.lookup(3).await.unwrap();
        assert_eq!(note.name, "US 10Y T-Note");
    }

    #[tokio::test]
    async fn test_lookup_unknown_id() {
        let (_, catalog) = catalog();
        catalog.seed(&default_assets()).await.unwrap();
        assert!(matches!(
            catalog.lookup(99).await,
            Err(LedgerError::UnknownAssetType(99))
        ));
    }

    #[tokio::test]
    async fn test_lookup_corrupt_price() {
        let (store, catalog) = catalog();
        store
            .hset(
                "asset_id_7",
                &[("id", "7"), ("name", "junk"), ("price", "cheap"), ("class", "test")],
            )
            .await
            .unwrap();
        assert!(matches!(
            catalog.lookup(7).await,
            Err(LedgerError::CorruptCatalog(7))
        ));
    }

    #[tokio::test]
    async fn test_seed_rejects_non_positive_price() {
        let (_, catalog) = catalog();
        let bad = vec![AssetType {
            id: 5,
            name: "void".to_string(),
            asset_class: "test".to_string(),
            unit_price: dec!(0),
        }];
        assert!(matches!(
            catalog.seed(&bad).await,
            Err(LedgerError::CorruptCatalog(5))
        ));
        assert!(matches!(
            catalog.lookup(5).await,
            Err(LedgerError::UnknownAssetType(5))
        ));
    }
}
