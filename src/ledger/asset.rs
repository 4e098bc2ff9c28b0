//! One holding: an asset id, its quantity, and the catalog fields resolved
//! at construction time.

use rust_decimal::Decimal;

use crate::catalog::AssetType;
use crate::errors::LedgerError;

/// A position in one asset type. Quantity is strictly positive for the
/// whole lifetime of the value; a sell that reaches zero removes the asset
/// from its portfolio instead of leaving a zero record.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    id: u32,
    name: String,
    asset_class: String,
    unit_price: Decimal,
    quantity: Decimal,
}

impl Asset {
    /// Build a holding from a resolved catalog entry. Fails with
    /// [`LedgerError::InvalidQuantity`] unless `quantity > 0`.
    pub fn new(def: &AssetType, quantity: Decimal) -> Result<Self, LedgerError> {
        if quantity <= Decimal::ZERO {
            return Err(LedgerError::InvalidQuantity(quantity));
        }
        Ok(Self {
            id: def.id,
            name: def.name.clone(),
            asset_class: def.asset_class.clone(),
            unit_price: def.unit_price,
            quantity,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn asset_class(&self) -> &str {
        &self.asset_class
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn market_value(&self) -> Decimal {
        self.quantity * self.unit_price
    }

    /// Increase the position. `quantity` must already be validated positive
    /// by the caller (the portfolio's adjust path).
    pub(super) fn buy(&mut self, quantity: Decimal) {
        self.quantity += quantity;
    }

    /// Decrease the position by a positive amount. Underflow fails without
    /// mutating, so a rejected sell leaves the holding untouched.
    pub(super) fn sell(&mut self, quantity: Decimal) -> Result<(), LedgerError> {
        if quantity > self.quantity {
            return Err(LedgerError::NegativeQuantity {
                asset_id: self.id,
                quantity,
            });
        }
        self.quantity -= quantity;
        Ok(())
    }
}
