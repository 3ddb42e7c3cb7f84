//! Monthly border-crossing totals with trailing same-year averages.
//!
//! Pipeline: [`loader`] parses records and folds them into per-key totals,
//! [`aggregate`] derives averages from the finished totals, [`reports`]
//! joins and orders the rows, and [`output`] renders them.

pub mod aggregate;
pub mod error;
pub mod loader;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;

pub use error::{ReportError, Result};
