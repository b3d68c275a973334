//! PaperDesk arXiv Lookup Client
//!
//! Wraps the arXiv Atom API: query construction, response parsing, and
//! normalization into the shared `Paper` type. The parser always
//! produces sequences for entries and authors, so the upstream
//! "a single item is not wrapped in a list" inconsistency never leaks
//! past this crate.

mod client;
mod parse;

pub use client::{ArxivClient, SortBy};
pub use parse::{normalize_whitespace, parse_atom_feed};
