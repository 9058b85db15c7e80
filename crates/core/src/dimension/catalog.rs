//! In-memory dimension lookup used by validation.
//!
//! Names and codes match case-insensitively after trimming.

use std::collections::HashMap;

use ledgerwise_shared::types::{DimensionId, DimensionValueId};
use tracing::info;

use super::error::DimensionError;
use super::types::{Dimension, DimensionTag, DimensionValue, PendingDimensionValue};

/// Result of resolving a `(dimension, value)` label pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagLookup {
    /// Both labels matched.
    Resolved(DimensionTag),
    /// The dimension label matched nothing.
    UnknownDimension,
    /// The dimension matched but the value did not.
    UnknownValue(PendingDimensionValue),
}

/// Index over a client's dimensions and values.
#[derive(Debug, Clone, Default)]
pub struct DimensionCatalog {
    dimensions: Vec<Dimension>,
    values: Vec<DimensionValue>,
    dimension_keys: HashMap<String, usize>,
    values_by_dimension: HashMap<DimensionId, Vec<usize>>,
}

fn key(label: &str) -> String {
    label.trim().to_lowercase()
}

impl DimensionCatalog {
    /// Builds the index.
    #[must_use]
    pub fn new(dimensions: Vec<Dimension>, values: Vec<DimensionValue>) -> Self {
        let mut catalog = Self {
            dimensions: Vec::with_capacity(dimensions.len()),
            values: Vec::with_capacity(values.len()),
            ..Self::default()
        };
        for dimension in dimensions {
            catalog.insert_dimension(dimension);
        }
        for value in values {
            catalog.insert_value(value);
        }
        catalog
    }

    fn insert_dimension(&mut self, dimension: Dimension) {
        let idx = self.dimensions.len();
        self.dimension_keys.entry(key(&dimension.name)).or_insert(idx);
        self.dimension_keys.entry(key(&dimension.code)).or_insert(idx);
        self.dimensions.push(dimension);
    }

    fn insert_value(&mut self, value: DimensionValue) {
        let idx = self.values.len();
        self.values_by_dimension
            .entry(value.dimension_id)
            .or_default()
            .push(idx);
        self.values.push(value);
    }

    /// All dimensions in load order.
    #[must_use]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Dimension by id.
    #[must_use]
    pub fn dimension(&self, id: DimensionId) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.id == id)
    }

    /// Dimension by name or code.
    #[must_use]
    pub fn find_dimension(&self, label: &str) -> Option<&Dimension> {
        self.dimension_keys
            .get(&key(label))
            .map(|&idx| &self.dimensions[idx])
    }

    /// Values of a dimension in load order.
    pub fn values_of(&self, dimension_id: DimensionId) -> impl Iterator<Item = &DimensionValue> {
        self.values_by_dimension
            .get(&dimension_id)
            .into_iter()
            .flatten()
            .map(|&idx| &self.values[idx])
    }

    /// Value of a dimension by name or code.
    #[must_use]
    pub fn find_value(&self, dimension_id: DimensionId, label: &str) -> Option<&DimensionValue> {
        let wanted = key(label);
        self.values_of(dimension_id).find(|v| {
            key(&v.name) == wanted || v.code.as_deref().is_some_and(|c| key(c) == wanted)
        })
    }

    /// True if `value_id` is one of `dimension_id`'s values.
    #[must_use]
    pub fn contains_value(&self, dimension_id: DimensionId, value_id: DimensionValueId) -> bool {
        self.values_of(dimension_id).any(|v| v.id == value_id)
    }

    /// True if the tag references an active value of its own dimension.
    #[must_use]
    pub fn is_valid_tag(&self, tag: &DimensionTag) -> bool {
        self.values_of(tag.dimension_id)
            .any(|v| v.id == tag.dimension_value_id && v.is_active)
    }

    /// Resolves a label pair into a tag.
    #[must_use]
    pub fn resolve(&self, dimension_label: &str, value_label: &str) -> TagLookup {
        let Some(dimension) = self.find_dimension(dimension_label) else {
            return TagLookup::UnknownDimension;
        };
        match self.find_value(dimension.id, value_label) {
            Some(value) if value.is_active => TagLookup::Resolved(DimensionTag {
                dimension_id: dimension.id,
                dimension_value_id: value.id,
                dimension_name: dimension.name.clone(),
                value_name: value.name.clone(),
            }),
            _ => TagLookup::UnknownValue(PendingDimensionValue {
                dimension_id: dimension.id,
                dimension_name: dimension.name.clone(),
                value_name: value_label.trim().to_string(),
            }),
        }
    }

    /// Creates an operator-approved value and makes it visible to lookups.
    ///
    /// Approving a value that already exists returns the existing value,
    /// reactivated if it was inactive.
    ///
    /// # Errors
    ///
    /// Fails when the dimension is unknown or inactive, or the name is blank.
    pub fn approve_value(
        &mut self,
        pending: &PendingDimensionValue,
    ) -> Result<DimensionValue, DimensionError> {
        let name = pending.value_name.trim();
        if name.is_empty() {
            return Err(DimensionError::EmptyValueName);
        }
        let dimension = self
            .dimension(pending.dimension_id)
            .ok_or(DimensionError::DimensionNotFound(pending.dimension_id))?;
        if !dimension.is_active {
            return Err(DimensionError::DimensionInactive(dimension.id));
        }
        let wanted = key(name);
        let existing = self
            .values_by_dimension
            .get(&pending.dimension_id)
            .into_iter()
            .flatten()
            .copied()
            .find(|&idx| {
                let v = &self.values[idx];
                key(&v.name) == wanted || v.code.as_deref().is_some_and(|c| key(c) == wanted)
            });
        if let Some(idx) = existing {
            let value = &mut self.values[idx];
            if !value.is_active {
                value.is_active = true;
                info!(
                    dimension_id = %value.dimension_id,
                    value = %value.name,
                    "Dimension value reactivated"
                );
            }
            return Ok(value.clone());
        }

        let value = DimensionValue {
            id: DimensionValueId::new(),
            dimension_id: pending.dimension_id,
            code: None,
            name: name.to_string(),
            is_active: true,
        };
        info!(
            dimension_id = %value.dimension_id,
            value = %value.name,
            "Dimension value approved"
        );
        self.insert_value(value.clone());
        Ok(value)
    }
}
