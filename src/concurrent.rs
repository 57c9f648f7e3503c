use std::io;
use std::path::Path;
use std::thread;

use crate::error::{DbError, Result};
use crate::row::Row;
use crate::table::Table;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcurrentFetch {
    pub all: Vec<Row>,
    pub older: Vec<Row>,
}

pub fn fetch_users(path: &Path) -> Result<Vec<Row>> {
    Table::connect(path)?.select_all()
}

pub fn fetch_older_users(path: &Path, older_than: u32) -> Result<Vec<Row>> {
    Table::connect(path)?.select_where(|row| row.age() > older_than)
}

/// Runs both reads side by side, each on its own connection, and joins them.
pub fn fetch_concurrently(path: impl AsRef<Path>, older_than: u32) -> Result<ConcurrentFetch> {
    let path = path.as_ref();
    thread::scope(|s| {
        let all = s.spawn(|| fetch_users(path));
        let older = s.spawn(|| fetch_older_users(path, older_than));
        Ok(ConcurrentFetch {
            all: join(all)??,
            older: join(older)??,
        })
    })
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> Result<T> {
    handle
        .join()
        .map_err(|_| DbError::Io(io::Error::other("query thread panicked")))
}
