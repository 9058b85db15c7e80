//! Second-pass parent resolution with cycle detection.

use std::collections::{HashMap, HashSet};

use ledgerwise_shared::types::AccountId;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::index::ChartIndex;
use super::reconcile::ParentLink;
use super::warning::{ImportWarning, WarningCode};

/// A parent assignment that passed every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentAssignment {
    /// Child account.
    pub account_id: AccountId,
    /// New parent.
    pub parent_id: AccountId,
}

/// Outcome of the parent pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentResolution {
    /// Assignments to persist, in row order.
    pub assignments: Vec<ParentAssignment>,
    /// Rejected links.
    pub warnings: Vec<ImportWarning>,
}

/// True if `parent` reaches `child` by walking parent links.
///
/// The walk keeps a visited set, so a pre-existing loop elsewhere in the
/// chart ends the walk instead of spinning.
fn reaches(parents: &HashMap<AccountId, Option<AccountId>>, start: AccountId, target: AccountId) -> bool {
    let mut visited = HashSet::new();
    let mut current = Some(start);
    while let Some(id) = current {
        if id == target {
            return true;
        }
        if !visited.insert(id) {
            return true;
        }
        current = parents.get(&id).copied().flatten();
    }
    false
}

/// Resolves parent codes into ids against the chart after adds are in place.
///
/// Links are processed in row order against a running parent map, so later
/// rows see earlier assignments. A rejected link leaves the child's parent as
/// it was (parentless for new accounts) and never fails the batch.
pub fn resolve_parent_links(chart: &ChartIndex, links: &[ParentLink]) -> ParentResolution {
    let mut parents: HashMap<AccountId, Option<AccountId>> = chart
        .accounts()
        .iter()
        .map(|a| (a.id, a.parent_id))
        .collect();
    let mut resolution = ParentResolution::default();

    for link in links {
        if chart.by_id(link.account_id).is_none() {
            continue;
        }
        let reject = |code: WarningCode, message: String| {
            warn!(row = link.row, account = %link.account_code, parent = %link.parent_code, "{message}");
            ImportWarning::row(link.row, Some(link.account_code.as_str()), code, message)
        };

        let Some(parent) = chart.by_code(&link.parent_code) else {
            resolution.warnings.push(reject(
                WarningCode::ParentNotFound,
                format!("Parent {} of {} not found", link.parent_code, link.account_code),
            ));
            continue;
        };

        if parent.id == link.account_id {
            resolution.warnings.push(reject(
                WarningCode::SelfParent,
                format!("{} cannot be its own parent", link.account_code),
            ));
            continue;
        }

        if reaches(&parents, parent.id, link.account_id) {
            resolution.warnings.push(reject(
                WarningCode::CircularParent,
                format!(
                    "Parent {} of {} would create a circular reference",
                    link.parent_code, link.account_code
                ),
            ));
            continue;
        }

        if parents.get(&link.account_id).copied().flatten() == Some(parent.id) {
            continue;
        }
        parents.insert(link.account_id, Some(parent.id));
        resolution.assignments.push(ParentAssignment {
            account_id: link.account_id,
            parent_id: parent.id,
        });
    }

    resolution
}
