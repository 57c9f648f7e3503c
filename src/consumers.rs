use std::path::Path;

use crate::error::Result;
use crate::paginate::Page;
use crate::row::Row;
use crate::stream::{stream_user_ages, stream_users_in_batches, BatchStream};

/// Rows of a page sequence that match a predicate, emitted as each page
/// arrives. Only the current page is held.
pub struct FilterRows<I, P> {
    pages: I,
    current: std::vec::IntoIter<Row>,
    predicate: P,
}

impl<I, P> Iterator for FilterRows<I, P>
where
    I: Iterator<Item = Result<Page>>,
    P: FnMut(&Row) -> bool,
{
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.current.by_ref().find(|r| (self.predicate)(r)) {
                return Some(Ok(row));
            }
            match self.pages.next()? {
                Ok(page) => self.current = page.into_iter(),
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

pub fn filter_pages<I, P>(pages: I, predicate: P) -> FilterRows<I::IntoIter, P>
where
    I: IntoIterator<Item = Result<Page>>,
    P: FnMut(&Row) -> bool,
{
    FilterRows {
        pages: pages.into_iter(),
        current: Vec::new().into_iter(),
        predicate,
    }
}

/// Users older than `min_age`, read in batches of `batch_size` on one connection.
pub fn batch_processing(
    path: impl AsRef<Path>,
    batch_size: usize,
    min_age: u32,
) -> Result<FilterRows<BatchStream, impl FnMut(&Row) -> bool>> {
    let batches = stream_users_in_batches(path, batch_size)?;
    Ok(filter_pages(batches, move |row: &Row| row.age() > min_age))
}

/// Running sum and count; the mean is only derived on demand.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RunningMean {
    sum: u64,
    count: u64,
}

impl RunningMean {
    pub fn push(&mut self, value: u32) {
        self.sum += u64::from(value);
        self.count += 1;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum as f64 / self.count as f64)
    }
}

impl Extend<u32> for RunningMean {
    fn extend<T: IntoIterator<Item = u32>>(&mut self, iter: T) {
        iter.into_iter().for_each(|v| self.push(v));
    }
}

/// Mean of the `age` column, `None` when the table is empty.
pub fn calculate_average_age(path: impl AsRef<Path>) -> Result<Option<f64>> {
    let mut mean = RunningMean::default();
    for age in stream_user_ages(path)? {
        mean.push(age?);
    }
    Ok(mean.mean())
}
