// Savings Circle - Core Library
// Exposes the group ledger for use in the TUI dashboard, API server, and tests

pub mod money;
pub mod tiers;
pub mod ledger;

// Re-export commonly used types
pub use money::{round2, format_naira};
pub use tiers::{TierKey, TierDefinition, TierPreview, TIERS};
pub use ledger::{
    GroupLedger, Member, LedgerError, MAX_MEMBERS,
    preview_tier,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
