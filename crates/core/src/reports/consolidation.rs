//! Consolidation across the entities of a group.
//!
//! Member entities share their client's chart, so balances are summed by
//! account id. Amounts are assumed to be in one currency.

use std::collections::HashMap;

use chrono::NaiveDate;
use ledgerwise_shared::types::{AccountId, ConsolidationGroupId};
use tracing::info;

use super::error::ReportError;
use super::service::ReportService;
use super::types::{ConsolidatedAccount, ConsolidatedReport, ConsolidationMember, EntityAmount};

/// Sums member balances into a group report.
pub struct ConsolidationService;

impl ConsolidationService {
    /// Consolidates the members' balances.
    ///
    /// Each account keeps a per-entity breakdown listing only the members
    /// with activity on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the group has no members.
    pub fn consolidate(
        group_id: ConsolidationGroupId,
        as_of: NaiveDate,
        members: &[ConsolidationMember],
    ) -> Result<ConsolidatedReport, ReportError> {
        if members.is_empty() {
            return Err(ReportError::EmptyConsolidationGroup(group_id));
        }

        let mut accounts: Vec<ConsolidatedAccount> = Vec::new();
        let mut positions: HashMap<AccountId, usize> = HashMap::new();
        for member in members {
            for balance in &member.balances {
                let share = EntityAmount {
                    entity_id: member.entity_id,
                    entity_code: member.entity_code.clone(),
                    balance: balance.balance,
                };
                match positions.get(&balance.account_id) {
                    Some(&idx) => {
                        let account = &mut accounts[idx];
                        account.balance.total_debit += balance.total_debit;
                        account.balance.total_credit += balance.total_credit;
                        account.balance.balance += balance.balance;
                        account.by_entity.push(share);
                    }
                    None => {
                        positions.insert(balance.account_id, accounts.len());
                        accounts.push(ConsolidatedAccount {
                            balance: balance.clone(),
                            by_entity: vec![share],
                        });
                    }
                }
            }
        }
        accounts.sort_by(|a, b| a.balance.code.cmp(&b.balance.code));

        let balances: Vec<_> = accounts.iter().map(|a| a.balance.clone()).collect();
        let totals = ReportService::totals(&balances);
        info!(
            group_id = %group_id,
            members = members.len(),
            accounts = accounts.len(),
            is_balanced = totals.is_balanced,
            "Consolidated group"
        );

        Ok(ConsolidatedReport {
            group_id,
            as_of,
            entities: members.iter().map(|m| m.entity_code.clone()).collect(),
            accounts,
            totals,
        })
    }
}
