//! Print folder model.
//!
//! # Invariants
//! - `id` is never blank and never equals [`UNORGANIZED_ID`].
//! - `name` is stored trimmed and never blank.

use super::ModelValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client-assigned folder identifier.
pub type GroupId = String;

/// Reserved id of the virtual folder holding every ungrouped entry.
///
/// Only accepted and emitted on external surfaces; in memory and in storage
/// "no folder" is `None`.
pub const UNORGANIZED_ID: &str = "unorganized";

/// Display name of the virtual folder.
pub const UNORGANIZED_NAME: &str = "Unorganized";

/// Named folder used to arrange entries for printing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    /// Position among folders. Re-derived from display order on save.
    #[serde(default)]
    pub print_order: i64,
}

impl Group {
    /// Creates a folder with a fresh random id.
    pub fn new(name: impl Into<String>, print_order: i64) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, print_order)
    }

    pub fn with_id(id: impl Into<GroupId>, name: impl Into<String>, print_order: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            print_order,
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.trim().is_empty() {
            return Err(ModelValidationError::BlankGroupId);
        }
        if self.id == UNORGANIZED_ID {
            return Err(ModelValidationError::ReservedGroupId);
        }
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::BlankGroupName);
        }
        Ok(())
    }
}

/// Maps an external parent reference to in-memory membership.
///
/// Blank strings and `"unorganized"` both mean "no folder".
pub fn parse_parent_ref(raw: &str) -> Option<GroupId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == UNORGANIZED_ID {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Inverse of [`parse_parent_ref`] for output surfaces.
pub fn parent_ref_label(parent_id: Option<&str>) -> &str {
    parent_id.unwrap_or(UNORGANIZED_ID)
}

/// Serde adapter writing `None` as `"unorganized"` and reading both forms.
pub(crate) mod parent_ref {
    use super::{parent_ref_label, parse_parent_ref, GroupId};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<GroupId>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(parent_ref_label(value.as_deref()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<GroupId>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_parent_ref))
    }
}
