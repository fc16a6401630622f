//! Data models for the absence review application.
//!
//! Ledger records keep the exact column names of the response CSV; view models are camelCase JSON.

mod absence;
mod response;
mod view;

pub use absence::*;
pub use response::*;
pub use view::*;
