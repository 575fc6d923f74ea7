//! Name resolution - positional addressing against the current listing
//!
//! Retrieval and deletion accept either a literal item name or a zero-based
//! index into the most recent listing. The listing order is the store's
//! `ORDER BY name` enumeration, so index addressing stays consistent within a
//! session; a resolved name is still only guaranteed valid for the
//! immediately following operation.

use crate::{Error, Result};

/// A user-supplied reference to a stored item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    /// Literal item name, e.g. `report.txt`
    Name(String),
    /// Zero-based position in the current listing
    Index(usize),
}

impl ItemRef {
    /// Parse a CLI token: an all-digit token addresses by index, anything
    /// else is taken as a literal name.
    pub fn parse(token: &str) -> Self {
        match token.parse::<usize>() {
            Ok(index) => ItemRef::Index(index),
            Err(_) => ItemRef::Name(token.to_string()),
        }
    }
}

/// Resolve a zero-based position against a snapshot of the enumeration order.
pub fn by_index(index: usize, ordered_names: &[String]) -> Result<&str> {
    ordered_names
        .get(index)
        .map(String::as_str)
        .ok_or(Error::IndexOutOfRange {
            index,
            len: ordered_names.len(),
        })
}
