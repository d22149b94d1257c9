//! Persisted barcode-to-text lookup table
//!
//! One SQLite table keyed by the barcode value. Every read goes straight to
//! the database; call frequency is at most one lookup per rendered frame and
//! volumes are small, so there is no caching layer in front of it.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StoreError;

/// A single barcode-to-text mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEntry {
    pub barcode: String,
    pub text: String,
}

impl LookupEntry {
    pub fn new(barcode: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            barcode: barcode.into(),
            text: text.into(),
        }
    }
}

/// Lookup table backed by a local SQLite file.
pub struct LookupStore {
    conn: Connection,
}

impl LookupStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory store, used by tests and available for dry runs.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS entries (
                barcode TEXT NOT NULL UNIQUE,
                string  TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn })
    }

    /// Insert a new mapping or overwrite the text of an existing one.
    ///
    /// The conflict check and the write are a single statement, so the
    /// operation is atomic.
    pub fn upsert(&self, barcode: &str, text: &str) -> Result<(), StoreError> {
        if barcode.is_empty() {
            return Err(StoreError::EmptyBarcode);
        }
        self.conn.execute(
            "INSERT INTO entries (barcode, string) VALUES (?1, ?2)
             ON CONFLICT(barcode) DO UPDATE SET string = excluded.string",
            params![barcode, text],
        )?;
        Ok(())
    }

    /// Apply [`LookupStore::upsert`] to every entry inside one transaction.
    ///
    /// Either the whole batch commits or none of it does.
    pub fn upsert_batch(&mut self, entries: &[LookupEntry]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        for entry in entries {
            if entry.barcode.is_empty() {
                return Err(StoreError::EmptyBarcode);
            }
            tx.execute(
                "INSERT INTO entries (barcode, string) VALUES (?1, ?2)
                 ON CONFLICT(barcode) DO UPDATE SET string = excluded.string",
                params![entry.barcode, entry.text],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Point read. An unknown barcode is `None`, not an error.
    pub fn lookup(&self, barcode: &str) -> Result<Option<String>, StoreError> {
        let text = self
            .conn
            .query_row(
                "SELECT string FROM entries WHERE barcode = ?1",
                params![barcode],
                |row| row.get(0),
            )
            .optional()?;
        Ok(text)
    }

    /// Remove a mapping. A missing barcode is a no-op.
    pub fn delete(&self, barcode: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM entries WHERE barcode = ?1",
            params![barcode],
        )?;
        Ok(())
    }

    /// All entries in storage (insertion) order.
    pub fn list_all(&self) -> Result<Vec<LookupEntry>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT barcode, string FROM entries ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok(LookupEntry {
                barcode: row.get(0)?,
                text: row.get(1)?,
            })
        })?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> LookupStore {
        LookupStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_upsert_and_lookup() {
        let s = store();
        s.upsert("123", "A").unwrap();
        assert_eq!(s.lookup("123").unwrap(), Some("A".to_string()));
        assert_eq!(s.lookup("456").unwrap(), None);
    }

    #[test]
    fn test_upsert_idempotent() {
        let s = store();
        s.upsert("b", "t").unwrap();
        s.upsert("b", "t").unwrap();
        let all = s.list_all().unwrap();
        assert_eq!(all, vec![LookupEntry::new("b", "t")]);
    }

    #[test]
    fn test_upsert_overwrites() {
        let s = store();
        s.upsert("123", "A").unwrap();
        s.upsert("123", "B").unwrap();
        assert_eq!(s.lookup("123").unwrap(), Some("B".to_string()));
        assert_eq!(s.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_upsert_rejects_empty_barcode() {
        let s = store();
        assert!(matches!(s.upsert("", "x"), Err(StoreError::EmptyBarcode)));
        assert!(s.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let s = store();
        s.upsert("keep", "me").unwrap();
        s.delete("nope").unwrap();
        assert_eq!(s.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_removes() {
        let s = store();
        s.upsert("gone", "soon").unwrap();
        s.delete("gone").unwrap();
        assert_eq!(s.lookup("gone").unwrap(), None);
    }

    #[test]
    fn test_batch_merges_on_reimport() {
        // CSV imported twice, second import changes one row
        let mut s = store();
        s.upsert_batch(&[
            LookupEntry::new("111", "Hello"),
            LookupEntry::new("222", "Other"),
        ])
        .unwrap();
        s.upsert_batch(&[
            LookupEntry::new("111", "World"),
            LookupEntry::new("222", "Other"),
        ])
        .unwrap();

        assert_eq!(s.lookup("111").unwrap(), Some("World".to_string()));
        assert_eq!(s.list_all().unwrap().len(), 2);
    }

    #[test]
    fn test_batch_rolls_back_on_bad_row() {
        let mut s = store();
        let result = s.upsert_batch(&[
            LookupEntry::new("ok", "fine"),
            LookupEntry::new("", "broken"),
        ]);
        assert!(result.is_err());
        // The good row must not have been committed
        assert_eq!(s.lookup("ok").unwrap(), None);
    }

    #[test]
    fn test_list_all_in_insertion_order() {
        let s = store();
        s.upsert("z", "1").unwrap();
        s.upsert("a", "2").unwrap();
        s.upsert("m", "3").unwrap();
        let barcodes: Vec<_> = s
            .list_all()
            .unwrap()
            .into_iter()
            .map(|e| e.barcode)
            .collect();
        assert_eq!(barcodes, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lookup.db");
        {
            let s = LookupStore::open(&path).unwrap();
            s.upsert("persisted", "yes").unwrap();
        }
        let s = LookupStore::open(&path).unwrap();
        assert_eq!(s.lookup("persisted").unwrap(), Some("yes".to_string()));
    }
}
