//! Database side of the reconciliation: reading and normalizing account names

pub mod accounts;
pub mod normalize;

pub use accounts::PostgresAccountSource;
pub use normalize::{AccountRules, DEFAULT_EXCLUDED_ACCOUNTS, PrefixStrip};
