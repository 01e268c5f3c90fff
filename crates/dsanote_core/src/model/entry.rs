//! Study entry model.
//!
//! # Responsibility
//! - Define the persisted entry record and its write-side shapes.
//! - Keep content fields opaque to ordering: only `parent_id` and
//!   `print_order` matter to the organizer.
//!
//! # Invariants
//! - `id` is client-assigned, non-blank and unique across entries.
//! - `row_id` is assigned by storage and is only used for by-row updates.

use super::group::{parent_ref, GroupId};
use super::ModelValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client-assigned entry identifier.
pub type EntryId = String;

/// Storage-assigned row identifier.
pub type RowId = i64;

/// Study content of one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryContent {
    pub title: String,
    pub intuition: String,
    pub approach: Vec<String>,
    pub dry_run: String,
    pub time_complexity: String,
    pub space_complexity: String,
    pub quick_revision: Vec<String>,
    pub code: String,
    pub tags: Vec<String>,
    /// Image references (URLs or data URIs), stored verbatim.
    pub images: Vec<String>,
}

impl EntryContent {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Persisted entry read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub row_id: RowId,
    pub id: EntryId,
    /// Owning folder. `None` means the virtual "unorganized" folder.
    #[serde(default, with = "parent_ref")]
    pub parent_id: Option<GroupId>,
    /// Position among siblings; ties fall back to sequence order.
    pub print_order: i64,
    #[serde(flatten)]
    pub content: EntryContent,
}

impl Entry {
    pub fn title(&self) -> &str {
        self.content.title.as_str()
    }

    pub fn in_group(&self, group_id: Option<&str>) -> bool {
        self.parent_id.as_deref() == group_id
    }
}

/// Write model for creating one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub id: EntryId,
    #[serde(default, with = "parent_ref")]
    pub parent_id: Option<GroupId>,
    #[serde(default)]
    pub print_order: i64,
    #[serde(flatten)]
    pub content: EntryContent,
}

impl NewEntry {
    /// Creates an ungrouped entry with a fresh random id.
    pub fn new(content: EntryContent) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), content)
    }

    /// Creates an ungrouped entry with a caller-provided id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: impl Into<EntryId>, content: EntryContent) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            print_order: 0,
            content,
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.trim().is_empty() {
            return Err(ModelValidationError::BlankEntryId);
        }
        Ok(())
    }
}

/// Field-wise replacement for an existing entry. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub intuition: Option<String>,
    pub approach: Option<Vec<String>>,
    pub dry_run: Option<String>,
    pub time_complexity: Option<String>,
    pub space_complexity: Option<String>,
    pub quick_revision: Option<Vec<String>>,
    pub code: Option<String>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    /// `Some(None)` moves the entry back to the virtual folder.
    pub parent_id: Option<Option<GroupId>>,
    pub print_order: Option<i64>,
}

impl EntryPatch {
    /// Patch that replaces every content field and leaves placement alone.
    pub fn replace_content(content: EntryContent) -> Self {
        Self {
            title: Some(content.title),
            intuition: Some(content.intuition),
            approach: Some(content.approach),
            dry_run: Some(content.dry_run),
            time_complexity: Some(content.time_complexity),
            space_complexity: Some(content.space_complexity),
            quick_revision: Some(content.quick_revision),
            code: Some(content.code),
            tags: Some(content.tags),
            images: Some(content.images),
            parent_id: None,
            print_order: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(self, entry: &mut Entry) {
        let content = &mut entry.content;
        if let Some(value) = self.title {
            content.title = value;
        }
        if let Some(value) = self.intuition {
            content.intuition = value;
        }
        if let Some(value) = self.approach {
            content.approach = value;
        }
        if let Some(value) = self.dry_run {
            content.dry_run = value;
        }
        if let Some(value) = self.time_complexity {
            content.time_complexity = value;
        }
        if let Some(value) = self.space_complexity {
            content.space_complexity = value;
        }
        if let Some(value) = self.quick_revision {
            content.quick_revision = value;
        }
        if let Some(value) = self.code {
            content.code = value;
        }
        if let Some(value) = self.tags {
            content.tags = value;
        }
        if let Some(value) = self.images {
            content.images = value;
        }
        if let Some(value) = self.parent_id {
            entry.parent_id = value;
        }
        if let Some(value) = self.print_order {
            entry.print_order = value;
        }
    }
}
