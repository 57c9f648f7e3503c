use std::iter::FusedIterator;
use std::path::PathBuf;

use crate::error::{DbError, Result};
use crate::fetch::{PageSource, TableSource};
use crate::row::Row;

/// Rows returned by one bounded read, in table order.
pub type Page = Vec<Row>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ready { offset: usize },
    Exhausted,
}

/// Lazy, forward-only sequence of pages over a [`PageSource`].
///
/// Nothing is fetched until `next()` is called. The first empty page ends the
/// sequence; a failed fetch is yielded once as `Err` and also ends it.
pub struct Paginator<S> {
    source: S,
    page_size: usize,
    state: State,
}

impl<S: PageSource> Paginator<S> {
    pub fn new(source: S, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(DbError::InvalidPageSize);
        }
        Ok(Self {
            source,
            page_size,
            state: State::Ready { offset: 0 },
        })
    }

    /// Offset of the next page to fetch, `None` once the sequence has ended.
    pub fn offset(&self) -> Option<usize> {
        match self.state {
            State::Ready { offset } => Some(offset),
            State::Exhausted => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }
}

impl<S: PageSource> Iterator for Paginator<S> {
    type Item = Result<Page>;

    fn next(&mut self) -> Option<Self::Item> {
        let State::Ready { offset } = self.state else {
            return None;
        };

        match self.source.fetch(self.page_size, offset) {
            Ok(page) if page.is_empty() => {
                self.state = State::Exhausted;
                None
            }
            Ok(page) => {
                self.state = State::Ready {
                    offset: offset.saturating_add(self.page_size),
                };
                Some(Ok(page))
            }
            Err(err) => {
                tracing::warn!(offset, error = %err, "page fetch failed, stopping pagination");
                self.state = State::Exhausted;
                Some(Err(err))
            }
        }
    }
}

impl<S: PageSource> FusedIterator for Paginator<S> {}

/// Pages over the `user_data` table at `path`, one connection per page.
pub fn lazy_paginate(path: impl Into<PathBuf>, page_size: usize) -> Result<Paginator<TableSource>> {
    Paginator::new(TableSource::new(path), page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| Row::new(&i.to_string(), "n", "e", i as u32).unwrap())
            .collect()
    }

    fn memory(all: Vec<Row>) -> impl FnMut(usize, usize) -> Result<Page> {
        move |size, offset| Ok(all.iter().skip(offset).take(size).cloned().collect())
    }

    #[test]
    fn offset_walks_by_page_size() {
        let mut pages = Paginator::new(memory(rows(5)), 2).unwrap();
        assert_eq!(pages.offset(), Some(0));
        assert_eq!(pages.next().unwrap().unwrap().len(), 2);
        assert_eq!(pages.offset(), Some(2));
        assert_eq!(pages.next().unwrap().unwrap().len(), 2);
        assert_eq!(pages.offset(), Some(4));
        assert_eq!(pages.next().unwrap().unwrap().len(), 1);
        assert_eq!(pages.offset(), Some(6));
        assert!(pages.next().is_none());
        assert!(pages.is_exhausted());
        assert_eq!(pages.offset(), None);
        assert!(pages.next().is_none());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(matches!(
            Paginator::new(memory(rows(1)), 0),
            Err(DbError::InvalidPageSize)
        ));
    }

    #[test]
    fn error_is_yielded_once_then_ends() {
        let failing = |_: usize, _: usize| -> Result<Page> { Err(DbError::TableFull) };
        let mut pages = Paginator::new(failing, 3).unwrap();
        assert!(matches!(pages.next(), Some(Err(DbError::TableFull))));
        assert!(pages.next().is_none());
    }
}
