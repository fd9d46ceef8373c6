//! Filter criteria for list queries

use crate::types::Record;

/// Criteria narrowing a list query
///
/// Absent criteria match everything. Builders treat an empty string as
/// absent so that `{ "state": "" }` behaves like no state filter at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Exact match against the record state
    pub state: Option<String>,
    /// Case-insensitive substring of the display name
    pub alias_contains: Option<String>,
    /// Entity id that must appear inside the record's config tree
    pub entity_reference: Option<String>,
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    (!value.is_empty()).then_some(value)
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = non_empty(state);
        self
    }

    pub fn with_alias_contains(mut self, fragment: impl Into<String>) -> Self {
        self.alias_contains = non_empty(fragment);
        self
    }

    pub fn with_entity_reference(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_reference = non_empty(entity_id);
        self
    }

    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.alias_contains.is_none() && self.entity_reference.is_none()
    }

    /// Whether the record passes the criteria that only need its summary
    pub fn matches_summary(&self, record: &Record) -> bool {
        if let Some(state) = &self.state {
            if record.state != *state {
                return false;
            }
        }

        if let Some(fragment) = &self.alias_contains {
            if !record
                .display_name
                .to_lowercase()
                .contains(&fragment.to_lowercase())
            {
                return false;
            }
        }

        true
    }
}
