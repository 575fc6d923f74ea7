//! SQLite blob store implementation
//!
//! All access to the backing database goes through a permit-of-one guard: the
//! permit is taken, a fresh connection is opened, the operation runs, and the
//! connection is dropped (closed) on every exit path. No connection is cached
//! across calls. The permit makes the store safe to share between threads in
//! principle, although the interactive CLI never issues concurrent calls.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use regex::Regex;
use rusqlite::{Connection, OptionalExtension, params};

use super::schema;
use crate::content::{self, ContentType};
use crate::resolve::{self, ItemRef};
use crate::{Error, Result};

/// One stored file: a name-keyed, type-tagged, base64-content row
#[derive(Debug, Clone)]
pub struct StorageItem {
    pub name: String,
    /// Source directory the item was ingested from; informational only
    pub path: String,
    pub content_type: ContentType,
    pub content: String,
}

/// SQLite-backed blob store with serialized access
pub struct BlobStore {
    db_path: PathBuf,
    gate: Mutex<()>,
}

impl BlobStore {
    /// Open a store at the given database path, creating the schema if the
    /// database does not exist yet. An already-initialized database is not an
    /// error.
    pub fn open(db_path: &Path) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_path_buf(),
            gate: Mutex::new(()),
        };
        store.with_conn(|conn| {
            for stmt in schema::all_schema_statements() {
                conn.execute(stmt, [])?;
            }
            Ok(())
        })?;
        Ok(store)
    }

    /// Run one operation under the connection guard.
    ///
    /// Blocks until the single permit is available, opens the connection, and
    /// releases both on every exit path: the connection closes when dropped,
    /// the permit when the lock guard goes out of scope. A poisoned permit is
    /// guard misuse and unrecoverable.
    fn with_conn<T>(&self, op: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let _permit = self.gate.lock().map_err(|_| Error::GuardPoisoned)?;
        let conn = Connection::open(&self.db_path)?;
        op(&conn)
    }

    /// Store one file: classify its extension, encode the content, insert.
    ///
    /// Re-storing an existing name fails on the uniqueness constraint rather
    /// than overwriting.
    pub fn store(&self, name: &str, source_dir: &Path, raw: &[u8], extension: &str) -> Result<()> {
        validate_name(name)?;
        let content_type = ContentType::classify(extension)?;
        let encoded = match content_type {
            ContentType::Text => content::encode_text(raw),
            ContentType::Image => content::encode_image(raw, extension)?,
        };

        self.with_conn(|conn| {
            conn.execute(
                schema::INSERT_ITEM,
                params![
                    name,
                    source_dir.to_string_lossy(),
                    content_type.as_str(),
                    encoded
                ],
            )?;
            Ok(())
        })?;
        tracing::debug!(name, kind = content_type.as_str(), "stored item");
        Ok(())
    }

    /// Retrieve an item's raw bytes by name or listing index.
    ///
    /// The stored content type must equal `expected`; on mismatch no payload
    /// is returned. Returns the resolved name alongside the decoded bytes so
    /// the caller can persist them under it.
    pub fn retrieve(&self, item: &ItemRef, expected: ContentType) -> Result<(String, Vec<u8>)> {
        let name = self.resolve(item)?;
        let row = self
            .fetch(&name)?
            .ok_or_else(|| Error::NotFound(name.clone()))?;

        if row.content_type != expected {
            return Err(Error::TypeMismatch {
                name,
                stored: row.content_type,
                requested: expected,
            });
        }

        let raw = content::decode(&row.content)?;
        Ok((name, raw))
    }

    /// Delete an item by name or listing index.
    ///
    /// Best-effort: deleting a name that does not exist affects zero rows and
    /// succeeds. Returns the resolved name.
    pub fn delete(&self, item: &ItemRef) -> Result<String> {
        let name = self.resolve(item)?;
        self.with_conn(|conn| {
            conn.execute(schema::DELETE_ITEM, [name.as_str()])?;
            Ok(())
        })?;
        tracing::debug!(name, "deleted item");
        Ok(name)
    }

    /// Enumerate stored names in the stable listing order
    pub fn list(&self) -> Result<Vec<String>> {
        Ok(self
            .fetch_all()?
            .into_iter()
            .map(|item| item.name)
            .collect())
    }

    /// Fetch one item row by name
    pub fn fetch(&self, name: &str) -> Result<Option<StorageItem>> {
        self.with_conn(|conn| {
            conn.query_row(schema::FETCH_ITEM, [name], row_to_item)
                .optional()
                .map_err(Into::into)
        })
    }

    /// Fetch all item rows in listing order
    pub fn fetch_all(&self) -> Result<Vec<StorageItem>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(schema::FETCH_ALL)?;
            let items = stmt
                .query_map([], row_to_item)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(items)
        })
    }

    /// Resolve a name-or-index reference against the current listing
    pub fn resolve(&self, item: &ItemRef) -> Result<String> {
        match item {
            ItemRef::Name(name) => Ok(name.clone()),
            ItemRef::Index(index) => {
                let names = self.list()?;
                Ok(resolve::by_index(*index, &names)?.to_string())
            }
        }
    }
}

/// Helper to convert a row to a StorageItem
fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<StorageItem> {
    let kind_str: String = row.get(2)?;
    let content_type = kind_str.parse::<ContentType>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(StorageItem {
        name: row.get(0)?,
        path: row.get(1)?,
        content_type,
        content: row.get(3)?,
    })
}

static NAME_PATTERN: OnceLock<Regex> = OnceLock::new();

fn name_pattern() -> &'static Regex {
    NAME_PATTERN.get_or_init(|| {
        Regex::new(r"^[^.]{1,30}\.[a-z0-9]{2,4}$").expect("name pattern is valid")
    })
}

/// Validate an item name: base name plus a single extension, at most
/// [`schema::MAX_NAME_LEN`] characters
pub fn validate_name(name: &str) -> Result<()> {
    if name.len() <= schema::MAX_NAME_LEN && name_pattern().is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbErrorKind;
    use std::io::Cursor;

    fn temp_store() -> (tempfile::TempDir, BlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::open(&dir.path().join("storage.db")).unwrap();
        (dir, store)
    }

    fn sample_png() -> Vec<u8> {
        let img = image::RgbImage::from_fn(2, 2, |x, y| image::Rgb([x as u8, y as u8, 128]));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_store_and_retrieve_text() {
        let (_dir, store) = temp_store();
        let raw = b"hello blob store";
        store
            .store("note.txt", Path::new("/tmp/dock"), raw, "txt")
            .unwrap();

        let (name, bytes) = store
            .retrieve(&ItemRef::Name("note.txt".into()), ContentType::Text)
            .unwrap();
        assert_eq!(name, "note.txt");
        assert_eq!(bytes, raw);
    }

    #[test]
    fn test_duplicate_name_fails_with_integrity() {
        let (_dir, store) = temp_store();
        store
            .store("dup.txt", Path::new("/tmp"), b"first", "txt")
            .unwrap();
        let err = store
            .store("dup.txt", Path::new("/tmp"), b"second", "txt")
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Db {
                kind: DbErrorKind::Integrity,
                ..
            }
        ));
        // The second row was never written
        let (_, bytes) = store
            .retrieve(&ItemRef::Name("dup.txt".into()), ContentType::Text)
            .unwrap();
        assert_eq!(bytes, b"first");
    }

    #[test]
    fn test_type_mismatch_returns_no_payload() {
        let (_dir, store) = temp_store();
        store
            .store("note.txt", Path::new("/tmp"), b"text", "txt")
            .unwrap();

        let err = store
            .retrieve(&ItemRef::Name("note.txt".into()), ContentType::Image)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                stored: ContentType::Text,
                requested: ContentType::Image,
                ..
            }
        ));
    }

    #[test]
    fn test_unsupported_extension_inserts_nothing() {
        let (_dir, store) = temp_store();
        let err = store
            .store("tool.exe", Path::new("/tmp"), b"MZ", "exe")
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedExtension(_)));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_retrieve_missing_item_is_not_found() {
        let (_dir, store) = temp_store();
        let err = store
            .retrieve(&ItemRef::Name("ghost.txt".into()), ContentType::Text)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(name) if name == "ghost.txt"));
    }

    #[test]
    fn test_index_resolution_follows_listing_order() {
        let (_dir, store) = temp_store();
        store
            .store("b.png", Path::new("/tmp"), &sample_png(), "png")
            .unwrap();
        store
            .store("a.txt", Path::new("/tmp"), b"text", "txt")
            .unwrap();

        // Listing is ordered by name regardless of insertion order
        assert_eq!(store.list().unwrap(), vec!["a.txt", "b.png"]);

        let (name, _) = store
            .retrieve(&ItemRef::Index(1), ContentType::Image)
            .unwrap();
        assert_eq!(name, "b.png");
    }

    #[test]
    fn test_index_out_of_range() {
        let (_dir, store) = temp_store();
        store
            .store("only.txt", Path::new("/tmp"), b"x", "txt")
            .unwrap();
        let err = store
            .retrieve(&ItemRef::Index(5), ContentType::Text)
            .unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 5, len: 1 }));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_dir, store) = temp_store();
        store
            .store("keep.txt", Path::new("/tmp"), b"x", "txt")
            .unwrap();

        let name = store.delete(&ItemRef::Name("ghost.txt".into())).unwrap();
        assert_eq!(name, "ghost.txt");
        assert_eq!(store.list().unwrap(), vec!["keep.txt"]);
    }

    #[test]
    fn test_delete_by_index() {
        let (_dir, store) = temp_store();
        store
            .store("a.txt", Path::new("/tmp"), b"a", "txt")
            .unwrap();
        store
            .store("b.txt", Path::new("/tmp"), b"b", "txt")
            .unwrap();

        let name = store.delete(&ItemRef::Index(0)).unwrap();
        assert_eq!(name, "a.txt");
        assert_eq!(store.list().unwrap(), vec!["b.txt"]);
    }

    #[test]
    fn test_sequential_stores_are_independently_retrievable() {
        let (_dir, store) = temp_store();
        store
            .store("one.txt", Path::new("/tmp"), b"one", "txt")
            .unwrap();
        store
            .store("two.txt", Path::new("/tmp"), b"two", "txt")
            .unwrap();

        let (_, one) = store
            .retrieve(&ItemRef::Name("one.txt".into()), ContentType::Text)
            .unwrap();
        let (_, two) = store
            .retrieve(&ItemRef::Name("two.txt".into()), ContentType::Text)
            .unwrap();
        assert_eq!(one, b"one");
        assert_eq!(two, b"two");
    }

    #[test]
    fn test_image_store_round_trip() {
        let (_dir, store) = temp_store();
        let source = sample_png();
        store
            .store("pic.png", Path::new("/tmp"), &source, "png")
            .unwrap();

        let (_, stored) = store
            .retrieve(&ItemRef::Name("pic.png".into()), ContentType::Image)
            .unwrap();
        let original = image::load_from_memory(&source).unwrap().to_rgb8();
        let round_tripped = image::load_from_memory(&stored).unwrap().to_rgb8();
        assert_eq!(original, round_tripped);
    }

    #[test]
    fn test_reopen_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("storage.db");
        {
            let store = BlobStore::open(&db_path).unwrap();
            store
                .store("persist.txt", Path::new("/tmp"), b"still here", "txt")
                .unwrap();
        }
        // Opening an already-initialized database is not an error
        let store = BlobStore::open(&db_path).unwrap();
        let (_, bytes) = store
            .retrieve(&ItemRef::Name("persist.txt".into()), ContentType::Text)
            .unwrap();
        assert_eq!(bytes, b"still here");
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("report.txt").is_ok());
        assert!(validate_name("photo.jpeg").is_ok());
        assert!(validate_name("no_extension").is_err());
        assert!(validate_name("two.dots.txt").is_err());
        assert!(validate_name(".txt").is_err());
        // 33 chars total, over the schema limit
        assert!(validate_name(&format!("{}.txt", "a".repeat(29))).is_err());
    }
}
