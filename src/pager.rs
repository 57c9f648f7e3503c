use std::fs::File;
use std::io;
use std::path::Path;

#[cfg(target_family = "unix")]
use std::os::unix::fs::FileExt;
#[cfg(target_family = "windows")]
use std::os::windows::fs::FileExt;

use crate::error::{DbError, Result};
use crate::{PAGE_SIZE, ROWS_PER_PAGE, ROW_SIZE, TABLE_MAX_PAGES};

pub type RawPage = [u8; PAGE_SIZE];

/// Page cache over the database file. Writes go straight through to the file,
/// reads fill the cache one storage page at a time.
pub struct Pager {
    file_descriptor: File,
    file_length: usize,
    pages: Vec<Option<Box<RawPage>>>,
}

impl Pager {
    pub fn open(filename: impl AsRef<Path>) -> Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .read(true)
            .open(filename)?;
        Self::from_file(file)
    }

    /// Opens an existing database for reading. A missing file is an error.
    pub fn open_read_only(filename: impl AsRef<Path>) -> Result<Self> {
        let file = File::options().read(true).open(filename)?;
        Self::from_file(file)
    }

    fn from_file(file: File) -> Result<Self> {
        let file_length = usize::try_from(file.metadata()?.len())
            .map_err(|e| DbError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        Ok(Self {
            file_descriptor: file,
            file_length,
            pages: vec![None; TABLE_MAX_PAGES],
        })
    }

    /// Number of complete rows stored in the file.
    pub fn num_rows(&self) -> usize {
        let full_pages = self.file_length / PAGE_SIZE;
        let tail_rows = ((self.file_length % PAGE_SIZE) / ROW_SIZE).min(ROWS_PER_PAGE);
        full_pages * ROWS_PER_PAGE + tail_rows
    }

    pub fn save_row(&mut self, row_num: usize, row: &[u8; ROW_SIZE]) -> Result<()> {
        let page_num = page_num(row_num);
        let slot = slot_offset(row_num);
        let file_offset = page_num * PAGE_SIZE + slot;

        // load first so the cached copy matches the rest of the page on disk
        let page = self.get_page(page_num)?;
        page[slot..slot + ROW_SIZE].copy_from_slice(row);

        write_all_at(&self.file_descriptor, row, file_offset as u64)?;
        self.file_length = self.file_length.max(file_offset + ROW_SIZE);
        Ok(())
    }

    pub fn get_page(&mut self, page_num: usize) -> Result<&mut RawPage> {
        if page_num >= TABLE_MAX_PAGES {
            return Err(DbError::PageOutOfBounds { page_num });
        }
        if self.pages[page_num].is_none() {
            // Cache miss. Allocate memory and load from file.
            let mut num_pages = self.file_length / PAGE_SIZE;

            // We might save a partial page at the end of the file
            if (self.file_length % PAGE_SIZE) > 0 {
                num_pages += 1;
            }
            let mut page: Box<RawPage> = Box::new([0u8; PAGE_SIZE]);
            if page_num < num_pages {
                read_at(
                    &self.file_descriptor,
                    &mut page[..],
                    (page_num * PAGE_SIZE) as u64,
                )?;
            }
            tracing::trace!(page_num, "loaded storage page");
            self.pages[page_num] = Some(page);
        }

        self.pages[page_num]
            .as_deref_mut()
            .ok_or(DbError::PageOutOfBounds { page_num })
    }

    pub fn get_row(&mut self, row_num: usize) -> Result<&[u8]> {
        let slot = slot_offset(row_num);
        let page = self.get_page(page_num(row_num))?;
        Ok(&page[slot..slot + ROW_SIZE])
    }

    pub fn free(&mut self) {
        self.pages.iter_mut().for_each(|p| *p = None);
    }
}

fn page_num(row_num: usize) -> usize {
    row_num / ROWS_PER_PAGE
}

fn slot_offset(row_num: usize) -> usize {
    let row_offset = row_num % ROWS_PER_PAGE;
    row_offset * ROW_SIZE
}

/// Reads until `buf` is full or the file ends; the unread tail stays zeroed.
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        #[cfg(target_family = "unix")]
        let n = file.read_at(&mut buf[filled..], offset + filled as u64)?;
        #[cfg(target_family = "windows")]
        let n = file.seek_read(&mut buf[filled..], offset + filled as u64)?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

fn write_all_at(file: &File, buf: &[u8], offset: u64) -> io::Result<()> {
    #[cfg(target_family = "unix")]
    file.write_all_at(buf, offset)?;

    #[cfg(target_family = "windows")]
    {
        let mut written = 0;
        while written < buf.len() {
            let n = file.seek_write(&buf[written..], offset + written as u64)?;
            if n == 0 {
                return Err(io::ErrorKind::WriteZero.into());
            }
            written += n;
        }
    }
    Ok(())
}
