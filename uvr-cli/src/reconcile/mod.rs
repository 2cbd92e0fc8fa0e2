//! Reconciliation engines shared by every report
//!
//! Each engine is a pure function over [`crate::table::Table`] values; the
//! report pipelines in [`crate::pipeline`] sequence them.

pub mod annotate;
pub mod dedup;
pub mod derive;
pub mod merge;
pub mod ordering;

pub use annotate::{group_boundaries, missing_identifier_rows};
pub use dedup::exclude_known;
pub use derive::{AccessTag, derive_access_columns};
pub use merge::{left_join, refresh_trailing_column};
pub use ordering::{sort_by_region, sort_missing_first, sort_records};
