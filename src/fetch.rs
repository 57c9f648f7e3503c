use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::paginate::Page;
use crate::table::Table;

/// Something that can serve one bounded page of rows.
pub trait PageSource {
    fn fetch(&mut self, page_size: usize, offset: usize) -> Result<Page>;
}

impl<F> PageSource for F
where
    F: FnMut(usize, usize) -> Result<Page>,
{
    fn fetch(&mut self, page_size: usize, offset: usize) -> Result<Page> {
        self(page_size, offset)
    }
}

/// Fetches each page on a fresh read-only connection to the database file.
#[derive(Debug, Clone)]
pub struct TableSource {
    path: PathBuf,
}

impl TableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageSource for TableSource {
    fn fetch(&mut self, page_size: usize, offset: usize) -> Result<Page> {
        paginate_users(&self.path, page_size, offset)
    }
}

/// Reads rows `[offset, offset + page_size)` from the table at `path`.
///
/// The connection lives only for this call. Past the end of the table the
/// page is empty; a missing or unreadable database is an error.
pub fn paginate_users(path: impl AsRef<Path>, page_size: usize, offset: usize) -> Result<Page> {
    let mut table = Table::connect(path)?;
    let rows = table.select_range(page_size, offset)?;
    tracing::debug!(page_size, offset, rows = rows.len(), "fetched page");
    Ok(rows)
}
