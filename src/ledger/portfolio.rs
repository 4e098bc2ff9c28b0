//! Per-user portfolio: a holdings map plus an incrementally maintained NAV.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::catalog::AssetType;
use crate::errors::LedgerError;

use super::Asset;

/// One user's full holding set. NAV is updated in step with every mutation;
/// [`Portfolio::recomputed_nav`] is the from-scratch sum the invariant is
/// checked against in tests. A portfolio with zero holdings is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    user: String,
    holdings: BTreeMap<u32, Asset>,
    nav: Decimal,
}

impl Portfolio {
    /// Fresh, empty portfolio for a newly registered user.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            holdings: BTreeMap::new(),
            nav: Decimal::ZERO,
        }
    }

    /// Rebuild from already-resolved assets (the decode path). NAV is not
    /// stored on the wire and is always recomputed here.
    pub(crate) fn from_assets(user: String, holdings: BTreeMap<u32, Asset>) -> Self {
        let nav = holdings.values().map(Asset::market_value).sum();
        Self { user, holdings, nav }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn holdings(&self) -> &BTreeMap<u32, Asset> {
        &self.holdings
    }

    pub fn holding(&self, asset_id: u32) -> Option<&Asset> {
        self.holdings.get(&asset_id)
    }

    pub fn nav(&self) -> Decimal {
        self.nav
    }

    /// Full recomputation of the NAV from current holdings.
    pub fn recomputed_nav(&self) -> Decimal {
        self.holdings.values().map(Asset::market_value).sum()
    }

    /// Apply a signed quantity change for one asset.
    ///
    /// * `delta == 0` is a no-op.
    /// * `delta > 0` buys: an absent id is only created when `allow_create`
    ///   is set (the create-holding entry point), otherwise it is
    ///   [`LedgerError::AssetNotFound`].
    /// * `delta < 0` sells: absent ids fail regardless of `allow_create`;
    ///   an underflow fails with [`LedgerError::NegativeQuantity`] and
    ///   leaves the portfolio untouched; reaching exactly zero removes the
    ///   holding.
    pub fn adjust(
        &mut self,
        def: &AssetType,
        delta: Decimal,
        allow_create: bool,
    ) -> Result<(), LedgerError> {
        if delta.is_zero() {
            return Ok(());
        }

        if delta > Decimal::ZERO {
            match self.holdings.entry(def.id) {
                Entry::Occupied(mut held) => held.get_mut().buy(delta),
                Entry::Vacant(slot) => {
                    if !allow_create {
                        return Err(LedgerError::AssetNotFound(def.id));
                    }
                    slot.insert(Asset::new(def, delta)?);
                }
            }
            self.nav += def.unit_price * delta;
            return Ok(());
        }

        let sell_quantity = -delta;
        let asset = self
            .holdings
            .get_mut(&def.id)
            .ok_or(LedgerError::AssetNotFound(def.id))?;
        asset.sell(sell_quantity)?;
        self.nav -= def.unit_price * sell_quantity;
        if asset.quantity().is_zero() {
            self.holdings.remove(&def.id);
        }
        Ok(())
    }

    /// Drop a holding outright. Absent ids are a no-op, not an error.
    pub fn remove_asset(&mut self, asset_id: u32) {
        if let Some(asset) = self.holdings.remove(&asset_id) {
            self.nav -= asset.market_value();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn def(id: u32, price: Decimal) -> AssetType {
        AssetType {
            id,
            name: format!("asset-{id}"),
            asset_class: "test".to_string(),
            unit_price: price,
        }
    }

    fn silver() -> AssetType {
        AssetType {
            id: 2,
            name: "Silver".to_string(),
            asset_class: "metals".to_string(),
            unit_price: dec!(5.0),
        }
    }

    #[test]
    fn test_new_portfolio_is_empty() {
        let p = Portfolio::new("john");
        assert_eq!(p.user(), "john");
        assert!(p.holdings().is_empty());
        assert_eq!(p.nav(), Decimal::ZERO);
    }

    #[test]
    fn test_buy_creates_holding_when_allowed() {
        let mut p = Portfolio::new("john");
        p.adjust(&silver(), dec!(4.0), true).unwrap();

        let held = p.holding(2).unwrap();
        assert_eq!(held.quantity(), dec!(4.0));
        assert_eq!(held.name(), "Silver");
        assert_eq!(held.unit_price(), dec!(5.0));
        assert_eq!(p.nav(), dec!(20.0));
    }

    #[test]
    fn test_buy_absent_without_create_fails() {
        let mut p = Portfolio::new("john");
        assert!(matches!(
            p.adjust(&silver(), dec!(4.0), false),
            Err(LedgerError::AssetNotFound(2))
        ));
        assert!(p.holdings().is_empty());
    }

    #[test]
    fn test_buy_accumulates() {
        let mut p = Portfolio::new("john");
        p.adjust(&silver(), dec!(5.0), true).unwrap();
        p.adjust(&silver(), dec!(2.5), false).unwrap();
        assert_eq!(p.holding(2).unwrap().quantity(), dec!(7.5));
        assert_eq!(p.nav(), dec!(37.5));
    }

    #[test]
    fn test_sell_decreases_quantity_and_nav() {
        let mut p = Portfolio::new("john");
        p.adjust(&silver(), dec!(5.0), true).unwrap();
        p.adjust(&silver(), dec!(-2.5), false).unwrap();
        assert_eq!(p.holding(2).unwrap().quantity(), dec!(2.5));
        assert_eq!(p.nav(), dec!(12.5));
    }

    #[test]
    fn test_sell_absent_fails_even_with_create() {
        let mut p = Portfolio::new("john");
        assert!(matches!(
            p.adjust(&silver(), dec!(-2.5), true),
            Err(LedgerError::AssetNotFound(2))
        ));
    }

    #[test]
    fn test_sell_to_exactly_zero_removes_holding() {
        let mut p = Portfolio::new("john");
        p.adjust(&silver(), dec!(5.0), true).unwrap();
        p.adjust(&silver(), dec!(-5.0), false).unwrap();
        assert!(p.holdings().is_empty());
        assert_eq!(p.nav(), Decimal::ZERO);
    }

    #[test]
    fn test_sell_underflow_is_atomic() {
        let mut p = Portfolio::new("john");
        p.adjust(&silver(), dec!(5.0), true).unwrap();
        let before = p.clone();

        assert!(matches!(
            p.adjust(&silver(), dec!(-5.1), false),
            Err(LedgerError::NegativeQuantity { asset_id: 2, .. })
        ));
        assert_eq!(p, before);
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let mut p = Portfolio::new("john");
        p.adjust(&silver(), dec!(5.0), true).unwrap();
        let before = p.clone();
        p.adjust(&silver(), Decimal::ZERO, false).unwrap();
        assert_eq!(p, before);
    }

    #[test]
    fn test_remove_asset_is_idempotent() {
        let mut p = Portfolio::new("john");
        p.adjust(&silver(), dec!(5.0), true).unwrap();

        p.remove_asset(2);
        assert!(p.holdings().is_empty());
        assert_eq!(p.nav(), Decimal::ZERO);

        // absent id: no-op
        p.remove_asset(2);
        assert_eq!(p.nav(), Decimal::ZERO);
    }

    #[test]
    fn test_incremental_nav_matches_recomputation() {
        let a = def(0, dec!(1286.59));
        let b = def(1, dec!(16255.18));
        let c = def(2, dec!(51.45));

        let mut p = Portfolio::new("john");
        p.adjust(&a, dec!(5), true).unwrap();
        p.adjust(&b, dec!(0.25), true).unwrap();
        p.adjust(&c, dec!(100), true).unwrap();
        p.adjust(&a, dec!(-2.5), false).unwrap();
        p.adjust(&c, dec!(-100), false).unwrap();
        p.remove_asset(1);
        p.adjust(&a, dec!(1.125), false).unwrap();

        assert_eq!(p.nav(), p.recomputed_nav());
        assert!(p.holdings().values().all(|a| a.quantity() > Decimal::ZERO));
    }
}
