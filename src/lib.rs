//! Search text normalization and matching for the YokaUnit tool catalog.
//!
//! [`search`] holds the matcher used by the catalog's search box: queries and
//! corpus text are folded (katakana to hiragana, full-width letters and
//! digits to ASCII, whitespace collapsed) and compared by substring.

pub mod catalog;
pub mod config;
pub mod fold;
pub mod logging;
pub mod search;

pub use catalog::{Catalog, CatalogError, ToolEntry};
pub use search::{is_match, normalize_query, normalize_target};
