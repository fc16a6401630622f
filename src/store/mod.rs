//! Flat-file stores backing the review flow.
//!
//! The absence spreadsheet and supervisor list are read fresh on every session start; the
//! response ledger is loaded whole on read and appended to on write. None of these files are
//! locked: concurrent appends from different sessions can interleave.

mod absences;
mod directory;
mod ledger;

pub use absences::*;
pub use directory::*;
pub use ledger::*;
