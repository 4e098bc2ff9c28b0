//! In-memory ledger engine
//!
//! The only code allowed to mutate holdings and NAV. All operations here
//! are synchronous and act on one decoded [`Portfolio`] at a time; the
//! gateway guarantees a single writer per user while an instance is live.

mod asset;
mod portfolio;

pub use asset::Asset;
pub use portfolio::Portfolio;
