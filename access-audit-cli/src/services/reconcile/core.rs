//! Reconciliation of database accounts against directory group members

use super::models::{
    AccountStatus, DatabaseAccountList, DirectoryMemberSet, ReconciliationResult,
    ReconciliationRow,
};
use std::collections::BTreeSet;

/// Classify every database account against the directory group.
///
/// The database list is the iteration domain and the directory set is only
/// a membership oracle: members present in the directory but missing from
/// the database never show up in the result.
pub fn reconcile(
    directory_members: &DirectoryMemberSet,
    database_accounts: &DatabaseAccountList,
) -> ReconciliationResult {
    let mut rows = Vec::with_capacity(database_accounts.len());
    let mut valid = BTreeSet::new();
    let mut to_delete = BTreeSet::new();

    for account in database_accounts.iter() {
        let in_directory_group = directory_members.contains(account);
        let status = if in_directory_group {
            valid.insert(account.clone());
            AccountStatus::Valid
        } else {
            to_delete.insert(account.clone());
            AccountStatus::NeedsDeletion
        };

        rows.push(ReconciliationRow {
            identifier: account.clone(),
            in_directory_group,
            in_database: true,
            status,
        });
    }

    ReconciliationResult::new(rows, valid, to_delete)
}
