//! Dimensional filtering for reports.

use serde::{Deserialize, Serialize};
use ledgerwise_shared::types::DimensionValueId;

use super::types::DimensionTag;

/// Filter for dimensional queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DimensionFilter {
    /// Filter by specific dimension values.
    pub dimension_values: Vec<DimensionValueId>,
    /// Include lines without dimension tags.
    pub include_untagged: bool,
}

impl DimensionFilter {
    /// Creates a new empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dimension value to the filter.
    #[must_use]
    pub fn with_value(mut self, value_id: DimensionValueId) -> Self {
        self.dimension_values.push(value_id);
        self
    }

    /// Sets whether to include untagged lines.
    #[must_use]
    pub const fn include_untagged(mut self, include: bool) -> Self {
        self.include_untagged = include;
        self
    }

    /// Returns true if the filter is empty (matches everything).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dimension_values.is_empty() && !self.include_untagged
    }

    /// Returns true if a line with `tags` passes the filter.
    ///
    /// A tagged line passes when any of its values is in the filter.
    #[must_use]
    pub fn matches(&self, tags: &[DimensionTag]) -> bool {
        if self.is_empty() {
            return true;
        }
        if tags.is_empty() {
            return self.include_untagged;
        }
        tags.iter()
            .any(|tag| self.dimension_values.contains(&tag.dimension_value_id))
    }
}
