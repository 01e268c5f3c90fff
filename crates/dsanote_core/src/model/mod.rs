//! Domain model for study entries and print folders.
//!
//! # Responsibility
//! - Define the records shared by stores, the organizer and the print renderer.
//! - Keep "no folder" as `Option::None` instead of a stored sentinel record.
//!
//! # Invariants
//! - Entry and group ids are client-assigned, stable and never reused.
//! - `"unorganized"` is reserved and never names a stored group.

pub mod backup;
pub mod entry;
pub mod group;
pub mod placement;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failures for model records before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Entry id is blank after trim.
    BlankEntryId,
    /// Group id is blank after trim.
    BlankGroupId,
    /// Group id collides with the reserved virtual group id.
    ReservedGroupId,
    /// Group name is blank after trim.
    BlankGroupName,
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankEntryId => write!(f, "entry id must not be blank"),
            Self::BlankGroupId => write!(f, "group id must not be blank"),
            Self::ReservedGroupId => {
                write!(f, "group id `{}` is reserved", group::UNORGANIZED_ID)
            }
            Self::BlankGroupName => write!(f, "folder name must not be blank"),
        }
    }
}

impl Error for ModelValidationError {}
