//! Print sequence derivation and plain-text print sheets.
//!
//! # Responsibility
//! - Flatten ordered folders into one paginated sequence.
//! - Render that sequence as a printable text sheet.
//!
//! # Invariants
//! - Page numbers start at 1 and are contiguous.
//! - Output depends only on input order; nothing is cached.

mod flatten;
mod sheet;

pub use flatten::{flatten, paginate, PrintPage, PrintSection};
pub use sheet::render_text;
