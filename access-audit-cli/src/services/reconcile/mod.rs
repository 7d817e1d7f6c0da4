// Reconciliation service for comparing database accounts with directory members
//
// Pure business logic: no I/O, no logging. Fetching happens in the api and
// database layers, rendering in the report layer.

pub mod core;
pub mod models;
pub mod summary;

// Re-export commonly used types
pub use self::core::reconcile;
pub use models::{
    AccountStatus, DatabaseAccountList, DirectoryMemberSet, Identifier, ReconciliationResult,
    ReconciliationRow,
};
pub use summary::SummaryFacts;
