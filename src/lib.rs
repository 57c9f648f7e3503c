use binary_serde::BinarySerde;

pub mod concurrent;
pub mod config;
pub mod consumers;
pub mod cursor;
pub mod error;
pub mod fetch;
pub mod pager;
pub mod paginate;
pub mod repl;
pub mod row;
pub mod seed;
pub mod statement;
pub mod stream;
pub mod table;

pub use config::Config;
pub use error::{DbError, Result};
pub use fetch::{paginate_users, PageSource, TableSource};
pub use paginate::{lazy_paginate, Page, Paginator};
pub use row::{Row, Value};
pub use table::Table;

pub const PAGE_SIZE: usize = 4096;
pub const TABLE_MAX_PAGES: usize = 100;
// ROW_SIZE = 550: user_id(36) + name(255) + email(255) + age(4)
pub const ROW_SIZE: usize = <Row as BinarySerde>::MAX_SERIALIZED_SIZE;
// rows held by one storage page
pub const ROWS_PER_PAGE: usize = PAGE_SIZE / ROW_SIZE;
pub const TABLE_MAX_ROWS: usize = ROWS_PER_PAGE * TABLE_MAX_PAGES;
