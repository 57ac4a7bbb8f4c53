//! Attribute merging and required-attribute checks used by every model.

use crate::error::{AzureError, AzureResult};

/// Typed attribute set of one resource kind.
pub trait Attributes: Clone + Default + PartialEq {
    /// Merge a freshly parsed projection onto the current attributes.
    ///
    /// Attributes `parse` always projects come from `parsed`. Attributes read
    /// from an optional payload block keep the value held by `self` when the
    /// block is absent, and attributes that only ever flow outbound (secrets,
    /// creation-only inputs) always keep the value held by `self`.
    fn apply(&self, parsed: Self) -> Self;
}

/// Accumulates the names of unset required attributes.
#[derive(Debug)]
pub struct Requires {
    resource: &'static str,
    missing: Vec<&'static str>,
}

impl Requires {
    pub fn new(resource: &'static str) -> Self {
        Self {
            resource,
            missing: Vec::new(),
        }
    }

    pub fn field<T>(mut self, name: &'static str, value: &Option<T>) -> Self {
        if value.is_none() {
            self.missing.push(name);
        }
        self
    }

    /// Only checked when `condition` holds.
    pub fn field_if<T>(self, condition: bool, name: &'static str, value: &Option<T>) -> Self {
        if condition {
            self.field(name, value)
        } else {
            self
        }
    }

    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }

    pub fn check(self) -> AzureResult<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(AzureError::missing_attributes(self.resource, &self.missing))
        }
    }
}

/// Unwrap an identity attribute or fail with `MissingAttribute`.
pub fn require<'a>(resource: &str, name: &str, value: &'a Option<String>) -> AzureResult<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| AzureError::missing_attributes(resource, &[name]))
}
