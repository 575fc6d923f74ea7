//! Database schema and statement definitions
//!
//! The schema is fixed and created once; engine operations never alter it.
//! All user-supplied values are passed as bound parameters - item names and
//! file content are never interpolated into statement text.

/// Maximum length of an item name, enforced by the schema and validated by
/// the engine before insertion
pub const MAX_NAME_LEN: usize = 32;

/// SQL to create the items table
pub const CREATE_ITEMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    name TEXT PRIMARY KEY NOT NULL CHECK(length(name) <= 32),
    path TEXT NOT NULL,
    content_type TEXT NOT NULL,
    content TEXT NOT NULL
)
"#;

/// SQL to insert one item row
pub const INSERT_ITEM: &str =
    "INSERT INTO items (name, path, content_type, content) VALUES (?1, ?2, ?3, ?4)";

/// SQL to fetch one item by name
pub const FETCH_ITEM: &str = "SELECT name, path, content_type, content FROM items WHERE name = ?1";

/// SQL to fetch all items.
///
/// Row order is imposed explicitly so that index addressing stays stable
/// across inserts and deletes, rather than relying on SQLite's incidental
/// row order.
pub const FETCH_ALL: &str = "SELECT name, path, content_type, content FROM items ORDER BY name";

/// SQL to delete one item by name; deliberately best-effort, deleting an
/// absent name affects zero rows and is not an error
pub const DELETE_ITEM: &str = "DELETE FROM items WHERE name = ?1";

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![CREATE_ITEMS_TABLE]
}
