use std::iter::FusedIterator;
use std::path::Path;

use crate::cursor::Cursor;
use crate::error::{DbError, Result};
use crate::row::Row;
use crate::table::Table;

/// Rows of one connection, read one at a time through a [`Cursor`].
pub struct UserStream {
    table: Table,
    cursor: Cursor,
    failed: bool,
}

impl UserStream {
    pub fn new(table: Table) -> Self {
        let cursor = table.cursor_start();
        Self {
            table,
            cursor,
            failed: false,
        }
    }
}

impl Iterator for UserStream {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor.is_end() {
            return None;
        }
        match self.table.row_at(&self.cursor) {
            Ok(row) => {
                self.cursor.advance(self.table.num_rows());
                Some(Ok(row))
            }
            Err(err) => {
                tracing::warn!(row_num = self.cursor.row_num(), error = %err, "row stream stopped");
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for UserStream {}

pub fn stream_users(path: impl AsRef<Path>) -> Result<UserStream> {
    Ok(UserStream::new(Table::connect(path)?))
}

/// Groups a [`UserStream`] into batches of at most `batch_size` rows.
pub struct BatchStream {
    rows: UserStream,
    batch_size: usize,
}

impl Iterator for BatchStream {
    type Item = Result<Vec<Row>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut batch = Vec::with_capacity(self.batch_size);
        for row in self.rows.by_ref().take(self.batch_size) {
            match row {
                Ok(row) => batch.push(row),
                Err(err) => return Some(Err(err)),
            }
        }
        if batch.is_empty() {
            None
        } else {
            Some(Ok(batch))
        }
    }
}

impl FusedIterator for BatchStream {}

pub fn stream_users_in_batches(path: impl AsRef<Path>, batch_size: usize) -> Result<BatchStream> {
    if batch_size == 0 {
        return Err(DbError::InvalidBatchSize);
    }
    Ok(BatchStream {
        rows: stream_users(path)?,
        batch_size,
    })
}

/// The `age` column alone, one value per row.
pub struct AgeStream {
    rows: UserStream,
}

impl Iterator for AgeStream {
    type Item = Result<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(|row| row.map(|r| r.age()))
    }
}

impl FusedIterator for AgeStream {}

pub fn stream_user_ages(path: impl AsRef<Path>) -> Result<AgeStream> {
    Ok(AgeStream {
        rows: stream_users(path)?,
    })
}
