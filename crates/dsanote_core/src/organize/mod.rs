//! In-memory print organizer.
//!
//! # Responsibility
//! - Hold one session's folders, entries, selection and save guard.
//! - Translate drag gestures into folder/entry moves.
//! - Derive the save batch and print sequence from display order.
//!
//! # Invariants
//! - The virtual "unorganized" folder is never stored, reordered or saved.
//! - Within a folder, display order is session sequence order.
//! - Stale ids never fail an operation; they turn it into a no-op.

mod drag;
mod organizer;

pub use drag::{DragAction, DragItem};
pub use organizer::{GroupView, MoveOutcome, Organizer, OrganizerError};
