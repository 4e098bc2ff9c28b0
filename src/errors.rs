//! Error taxonomy for the ledger core
//!
//! Business outcomes (not found, conflict, underflow) are distinct variants
//! so the boundary layer can translate them without string matching. Store
//! failures and corrupt records are the fault-side variants.

use rust_decimal::Decimal;

use crate::codec::CodecError;
use crate::store::StoreError;

/// Ways a stored portfolio record can turn out to be unusable. Codec
/// failures come straight from [`decode`](crate::codec::decode); the other
/// variants are consistency checks applied when the record is resolved
/// against its key and the catalog.
#[derive(Debug, thiserror::Error)]
pub enum RecordFault {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("record belongs to {found:?}, expected {expected:?}")]
    ForeignUser { expected: String, found: String },

    #[error("record references asset {0} which is missing from the catalog")]
    MissingAsset(u32),

    #[error("record holds a non-positive quantity {0}")]
    StoredQuantity(Decimal),
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("asset type {0} does not exist in the catalog")]
    UnknownAssetType(u32),

    #[error("asset {0} is not held in this portfolio")]
    AssetNotFound(u32),

    #[error("asset {0} already exists in this portfolio")]
    AssetAlreadyExists(u32),

    #[error("selling {quantity} units of asset {asset_id} would leave a negative quantity")]
    NegativeQuantity { asset_id: u32, quantity: Decimal },

    #[error("quantity must be strictly positive, got {0}")]
    InvalidQuantity(Decimal),

    #[error("user {0} not found")]
    UserNotFound(String),

    #[error("user {0} already exists")]
    UserAlreadyExists(String),

    #[error("catalog entry for asset {0} is corrupt")]
    CorruptCatalog(u32),

    #[error("stored portfolio record is corrupt: {0}")]
    CorruptRecord(#[from] RecordFault),

    #[error("key-value store failure: {0}")]
    Store(#[from] StoreError),
}

impl From<CodecError> for LedgerError {
    fn from(err: CodecError) -> Self {
        LedgerError::CorruptRecord(RecordFault::Codec(err))
    }
}

impl LedgerError {
    /// True for expected, caller-reportable outcomes. Corrupt records and
    /// store failures are operator-level conditions and return false.
    pub fn is_business(&self) -> bool {
        !matches!(
            self,
            LedgerError::CorruptCatalog(_)
                | LedgerError::CorruptRecord(_)
                | LedgerError::Store(_)
        )
    }
}
