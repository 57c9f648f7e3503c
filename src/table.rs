use std::path::Path;

use crate::cursor::Cursor;
use crate::error::{DbError, Result};
use crate::pager::Pager;
use crate::row::Row;
use crate::TABLE_MAX_ROWS;

/// The `user_data` table backed by one database file.
pub struct Table {
    num_rows: usize,
    pager: Pager,
}

impl Table {
    /// Opens the database for reading and writing, creating the file if needed.
    pub fn db_open(filename: impl AsRef<Path>) -> Result<Table> {
        let pager = Pager::open(filename)?;
        Ok(Self::with_pager(pager))
    }

    /// Opens a read-only connection to an existing database.
    pub fn connect(filename: impl AsRef<Path>) -> Result<Table> {
        let filename = filename.as_ref();
        let pager = Pager::open_read_only(filename)?;
        let table = Self::with_pager(pager);
        tracing::debug!(path = %filename.display(), rows = table.num_rows, "opened connection");
        Ok(table)
    }

    fn with_pager(pager: Pager) -> Table {
        let num_rows = pager.num_rows();
        Self { num_rows, pager }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn insert(&mut self, row: &Row) -> Result<()> {
        if self.num_rows >= TABLE_MAX_ROWS {
            return Err(DbError::TableFull);
        }
        if self.contains_key(row.user_id())? {
            return Err(DbError::DuplicateKey {
                user_id: row.user_id().to_string(),
            });
        }

        self.pager.save_row(self.num_rows, &row.encode())?;
        self.num_rows += 1;
        Ok(())
    }

    /// Whether a row with this `user_id` is already stored.
    pub fn contains_key(&mut self, user_id: &str) -> Result<bool> {
        let mut cursor = self.cursor_start();
        while !cursor.is_end() {
            if self.row_at(&cursor)?.user_id() == user_id {
                return Ok(true);
            }
            cursor.advance(self.num_rows);
        }
        Ok(false)
    }

    /// `SELECT * FROM user_data LIMIT limit OFFSET offset`.
    pub fn select_range(&mut self, limit: usize, offset: usize) -> Result<Vec<Row>> {
        let end = offset.saturating_add(limit).min(self.num_rows);
        (offset.min(end)..end).map(|i| self.read_row(i)).collect()
    }

    pub fn select_all(&mut self) -> Result<Vec<Row>> {
        self.select_range(self.num_rows, 0)
    }

    pub fn select_where<P>(&mut self, mut predicate: P) -> Result<Vec<Row>>
    where
        P: FnMut(&Row) -> bool,
    {
        let mut rows = Vec::new();
        let mut cursor = self.cursor_start();
        while !cursor.is_end() {
            let row = self.row_at(&cursor)?;
            if predicate(&row) {
                rows.push(row);
            }
            cursor.advance(self.num_rows);
        }
        Ok(rows)
    }

    pub fn cursor_start(&self) -> Cursor {
        Cursor::table_start(self.num_rows)
    }

    pub fn row_at(&mut self, cursor: &Cursor) -> Result<Row> {
        self.read_row(cursor.row_num())
    }

    fn read_row(&mut self, row_num: usize) -> Result<Row> {
        let data = self.pager.get_row(row_num)?;
        Row::decode(data, row_num)
    }

    pub fn free(&mut self) {
        self.pager.free()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(n: u32) -> (tempfile::TempDir, Table) {
        let dir = tempfile::tempdir().unwrap();
        let mut table = Table::db_open(dir.path().join("users.db")).unwrap();
        for i in 0..n {
            let row = Row::new(&format!("u{i}"), "name", "n@example.com", 20 + i).unwrap();
            table.insert(&row).unwrap();
        }
        (dir, table)
    }

    #[test]
    fn select_range_clamps_to_table() {
        let (_dir, mut table) = seeded(5);
        let ids = |rows: Vec<Row>| {
            rows.iter()
                .map(|r| r.user_id().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(table.select_range(2, 0).unwrap()), ["u0", "u1"]);
        assert_eq!(ids(table.select_range(10, 3).unwrap()), ["u3", "u4"]);
        assert!(table.select_range(2, 5).unwrap().is_empty());
        assert!(table.select_range(2, usize::MAX).unwrap().is_empty());
    }

    #[test]
    fn select_where_filters_in_order() {
        let (_dir, mut table) = seeded(6);
        let rows = table.select_where(|r| r.age() > 22).unwrap();
        let ages: Vec<u32> = rows.iter().map(Row::age).collect();
        assert_eq!(ages, [23, 24, 25]);
    }

    #[test]
    fn table_full() {
        let (_dir, mut table) = seeded(0);
        for i in 0..TABLE_MAX_ROWS {
            table.insert(&Row::new(&i.to_string(), "n", "e", 1).unwrap()).unwrap();
        }
        let row = Row::new("one more", "n", "e", 1).unwrap();
        assert!(matches!(table.insert(&row), Err(DbError::TableFull)));
    }

    #[test]
    fn duplicate_user_id_is_rejected() {
        let (_dir, mut table) = seeded(3);
        let again = Row::new("u1", "other", "other@example.com", 50).unwrap();
        assert!(matches!(
            table.insert(&again),
            Err(DbError::DuplicateKey { user_id }) if user_id == "u1"
        ));
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.select_where(|r| r.user_id() == "u1").unwrap().len(), 1);
        assert!(table.contains_key("u2").unwrap());
        assert!(!table.contains_key("u3").unwrap());
    }
}
