//! Journal entry state machine.
//!
//! The caller's role is passed in explicitly; nothing here reads ambient
//! session state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::entry::{EntryStatus, JournalEntry};
use super::error::JournalError;

/// Actor role, ordered from lowest to highest privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    /// Can draft and submit for approval.
    Staff = 0,
    /// Can post and approve.
    Accountant = 1,
    /// Full access.
    Admin = 2,
}

impl ActorRole {
    /// Parse a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "staff" => Some(Self::Staff),
            "accountant" => Some(Self::Accountant),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Accountant => "accountant",
            Self::Admin => "admin",
        }
    }

    /// Privileged actors post directly and approve pending entries.
    #[must_use]
    pub fn can_post(&self) -> bool {
        *self >= Self::Accountant
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated status change with audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// Status before the change.
    pub from: EntryStatus,
    /// Status after the change.
    pub to: EntryStatus,
    /// Role that made the change.
    pub actor: ActorRole,
    /// When the change was decided.
    pub at: DateTime<Utc>,
    /// Rejection reason, if any.
    pub reason: Option<String>,
}

/// Stateless service for journal entry transitions.
pub struct EntryLifecycle;

impl EntryLifecycle {
    /// Submits a draft.
    ///
    /// Staff submissions go to `PendingApproval`; privileged actors post
    /// directly, which requires the entry to pass every balance check.
    pub fn submit(entry: &JournalEntry, role: ActorRole) -> Result<StatusChange, JournalError> {
        let target = if role.can_post() {
            EntryStatus::Posted
        } else {
            EntryStatus::PendingApproval
        };
        if entry.status != EntryStatus::Draft {
            return Err(JournalError::InvalidTransition {
                from: entry.status,
                to: target,
            });
        }
        if target == EntryStatus::Posted {
            entry.validate_for_posting()?;
        } else {
            entry.balance().ensure_postable()?;
        }
        debug!(entry_id = %entry.id, role = %role, to = %target, "Journal entry submitted");
        Ok(Self::change(entry.status, target, role, None))
    }

    /// Approves a pending entry, posting it.
    pub fn approve(entry: &JournalEntry, role: ActorRole) -> Result<StatusChange, JournalError> {
        if !role.can_post() {
            return Err(JournalError::InsufficientPrivileges {
                role: role.to_string(),
                action: "approve journal entries",
            });
        }
        if entry.status != EntryStatus::PendingApproval {
            return Err(JournalError::InvalidTransition {
                from: entry.status,
                to: EntryStatus::Posted,
            });
        }
        entry.validate_for_posting()?;
        Ok(Self::change(entry.status, EntryStatus::Posted, role, None))
    }

    /// Rejects a pending entry back to draft.
    pub fn reject(
        entry: &JournalEntry,
        role: ActorRole,
        reason: &str,
    ) -> Result<StatusChange, JournalError> {
        if reason.trim().is_empty() {
            return Err(JournalError::RejectionReasonRequired);
        }
        if !role.can_post() {
            return Err(JournalError::InsufficientPrivileges {
                role: role.to_string(),
                action: "reject journal entries",
            });
        }
        if entry.status != EntryStatus::PendingApproval {
            return Err(JournalError::InvalidTransition {
                from: entry.status,
                to: EntryStatus::Draft,
            });
        }
        Ok(Self::change(
            entry.status,
            EntryStatus::Draft,
            role,
            Some(reason.trim().to_string()),
        ))
    }

    /// Returns an error unless the entry may be edited.
    pub fn ensure_editable(status: EntryStatus) -> Result<(), JournalError> {
        match status {
            EntryStatus::Posted => Err(JournalError::CannotModifyPosted),
            EntryStatus::Void => Err(JournalError::CannotModifyVoid),
            EntryStatus::Draft | EntryStatus::PendingApproval => Ok(()),
        }
    }

    /// Returns an error unless the entry may be deleted.
    pub fn ensure_deletable(status: EntryStatus) -> Result<(), JournalError> {
        if status == EntryStatus::Draft {
            Ok(())
        } else {
            Err(JournalError::CanOnlyDeleteDraft)
        }
    }

    /// Check if a status transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: EntryStatus, to: EntryStatus) -> bool {
        matches!(
            (from, to),
            (
                EntryStatus::Draft,
                EntryStatus::PendingApproval | EntryStatus::Posted
            ) | (
                EntryStatus::PendingApproval,
                EntryStatus::Posted | EntryStatus::Draft
            ) | (EntryStatus::Posted, EntryStatus::Void)
        )
    }

    fn change(
        from: EntryStatus,
        to: EntryStatus,
        actor: ActorRole,
        reason: Option<String>,
    ) -> StatusChange {
        StatusChange {
            from,
            to,
            actor,
            at: Utc::now(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::line::{AccountRef, JournalLine, LineAmount};
    use chrono::NaiveDate;
    use ledgerwise_shared::types::{ClientId, EntityId};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn entry(status: EntryStatus) -> JournalEntry {
        let mut entry = JournalEntry::draft(
            ClientId::new(),
            EntityId::new(),
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            "Office supplies",
            vec![
                JournalLine::new(AccountRef::Code("6000".into()), "HQ", LineAmount::debit(dec!(250))),
                JournalLine::new(AccountRef::Code("1000".into()), "HQ", LineAmount::credit(dec!(250))),
            ],
        );
        entry.status = status;
        entry
    }

    #[rstest]
    #[case(ActorRole::Staff, EntryStatus::PendingApproval)]
    #[case(ActorRole::Accountant, EntryStatus::Posted)]
    #[case(ActorRole::Admin, EntryStatus::Posted)]
    fn test_submit_target_depends_on_role(#[case] role: ActorRole, #[case] expected: EntryStatus) {
        let change = EntryLifecycle::submit(&entry(EntryStatus::Draft), role).unwrap();
        assert_eq!(change.from, EntryStatus::Draft);
        assert_eq!(change.to, expected);
        assert_eq!(change.actor, role);
    }

    #[test]
    fn test_submit_rejects_unbalanced() {
        let mut draft = entry(EntryStatus::Draft);
        draft.lines[0].amount = LineAmount::debit(dec!(300));
        assert!(matches!(
            EntryLifecycle::submit(&draft, ActorRole::Admin),
            Err(JournalError::UnbalancedEntry { .. })
        ));
    }

    #[test]
    fn test_submit_only_from_draft() {
        let err = EntryLifecycle::submit(&entry(EntryStatus::Posted), ActorRole::Admin).unwrap_err();
        assert!(matches!(err, JournalError::InvalidTransition { .. }));
    }

    #[test]
    fn test_approve_requires_privilege() {
        let pending = entry(EntryStatus::PendingApproval);
        assert!(matches!(
            EntryLifecycle::approve(&pending, ActorRole::Staff),
            Err(JournalError::InsufficientPrivileges { .. })
        ));
        let change = EntryLifecycle::approve(&pending, ActorRole::Accountant).unwrap();
        assert_eq!(change.to, EntryStatus::Posted);
    }

    #[test]
    fn test_reject_requires_reason() {
        let pending = entry(EntryStatus::PendingApproval);
        assert!(matches!(
            EntryLifecycle::reject(&pending, ActorRole::Admin, "  "),
            Err(JournalError::RejectionReasonRequired)
        ));
        let change = EntryLifecycle::reject(&pending, ActorRole::Admin, "Wrong account").unwrap();
        assert_eq!(change.to, EntryStatus::Draft);
        assert_eq!(change.reason.as_deref(), Some("Wrong account"));
    }

    #[rstest]
    #[case(EntryStatus::Draft, true, true)]
    #[case(EntryStatus::PendingApproval, true, false)]
    #[case(EntryStatus::Posted, false, false)]
    #[case(EntryStatus::Void, false, false)]
    fn test_edit_and_delete_rules(
        #[case] status: EntryStatus,
        #[case] editable: bool,
        #[case] deletable: bool,
    ) {
        assert_eq!(EntryLifecycle::ensure_editable(status).is_ok(), editable);
        assert_eq!(EntryLifecycle::ensure_deletable(status).is_ok(), deletable);
    }

    #[test]
    fn test_transition_table() {
        assert!(EntryLifecycle::is_valid_transition(EntryStatus::Draft, EntryStatus::Posted));
        assert!(EntryLifecycle::is_valid_transition(EntryStatus::Posted, EntryStatus::Void));
        assert!(!EntryLifecycle::is_valid_transition(EntryStatus::Void, EntryStatus::Draft));
        assert!(!EntryLifecycle::is_valid_transition(EntryStatus::Posted, EntryStatus::Draft));
    }
}
