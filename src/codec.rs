//! Wire codec for stored portfolio records
//!
//! A portfolio is persisted as a single flat string under the `data` field
//! of its user record:
//!
//! ```text
//! hex(user) ";" hex( join("#", hex(id) ";" hex(quantity) ...) )
//! ```
//!
//! where `id` and `quantity` are the ASCII renderings of the asset id and
//! decimal quantity. A portfolio with no holdings encodes to `hex(user) ";"`
//! with nothing after the separator. NAV is never stored; it is rebuilt from
//! catalog prices when the record is resolved.
//!
//! Decoding is strict: any malformed input (missing separator, odd-length or
//! non-hex payload, non-UTF-8 bytes, unparsable id/quantity, duplicate asset
//! id) fails with a [`CodecError`] instead of producing a wrong portfolio.
//! Catalog resolution is intentionally not done here; [`decode`] returns the
//! raw `(user, [(id, quantity)])` shape so the codec stays pure.

use rust_decimal::Decimal;

use crate::ledger::Portfolio;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("record is missing the user/assets separator")]
    MissingSeparator,

    #[error("malformed asset token {0:?}")]
    MalformedAsset(String),

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("decoded bytes are not valid utf-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("asset id {0:?} is not an integer")]
    InvalidAssetId(String),

    #[error("quantity {0:?} is not a valid decimal")]
    InvalidQuantity(String),

    #[error("asset {0} appears more than once in the record")]
    DuplicateAsset(u32),
}

/// One holding as it appears on the wire, before catalog resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHolding {
    pub asset_id: u32,
    pub quantity: Decimal,
}

/// A decoded record: the user identity plus unresolved holdings.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub user: String,
    pub holdings: Vec<RawHolding>,
}

/// Encode a portfolio into its flat storage string.
pub fn encode(portfolio: &Portfolio) -> String {
    let assets = portfolio
        .holdings()
        .values()
        .map(|asset| {
            format!(
                "{};{}",
                hex::encode(asset.id().to_string()),
                hex::encode(asset.quantity().to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("#");

    // hex of an empty assets blob is empty, so a zero-holding portfolio
    // encodes to "hex(user);"
    format!("{};{}", hex::encode(portfolio.user()), hex::encode(assets))
}

/// Decode a storage string back into a raw record. Exact inverse of
/// [`encode`] up to holding order, which is not semantically significant.
pub fn decode(data: &str) -> Result<RawRecord, CodecError> {
    let (user_hex, assets_hex) = data.split_once(';').ok_or(CodecError::MissingSeparator)?;

    let user = decode_hex_text(user_hex)?;
    let joined = decode_hex_text(assets_hex)?;

    let mut holdings: Vec<RawHolding> = Vec::new();
    if !joined.is_empty() {
        for token in joined.split('#') {
            let (id_hex, qty_hex) = token
                .split_once(';')
                .ok_or_else(|| CodecError::MalformedAsset(token.to_string()))?;

            let id_text = decode_hex_text(id_hex)?;
            let qty_text = decode_hex_text(qty_hex)?;

            let asset_id: u32 = id_text
                .parse()
                .map_err(|_| CodecError::InvalidAssetId(id_text.clone()))?;
            let quantity: Decimal = qty_text
                .parse()
                .map_err(|_| CodecError::InvalidQuantity(qty_text.clone()))?;

            if holdings.iter().any(|h| h.asset_id == asset_id) {
                return Err(CodecError::DuplicateAsset(asset_id));
            }
            holdings.push(RawHolding { asset_id, quantity });
        }
    }

    Ok(RawRecord { user, holdings })
}

fn decode_hex_text(input: &str) -> Result<String, CodecError> {
    Ok(String::from_utf8(hex::decode(input)?)?)
}
