use std::io::{self, Write};
use std::path::PathBuf;

use crate::concurrent::fetch_concurrently;
use crate::config::Config;
use crate::consumers::{batch_processing, calculate_average_age};
use crate::error::{DbError, Result};
use crate::fetch::paginate_users;
use crate::paginate::lazy_paginate;
use crate::row::Row;
use crate::statement::{
    parse_meta_command, prepare_statement, MetaCommand, PrepareError, Statement,
};
use crate::table::Table;

pub const PROMPT: &str = "db > ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// One shell session: a read-write handle on the table plus the settings the
/// paging commands fall back to.
pub struct Session {
    table: Table,
    path: PathBuf,
    config: Config,
}

impl Session {
    pub fn open(config: Config) -> Result<Self> {
        let table = Table::db_open(&config.db_path)?;
        Ok(Self {
            table,
            path: config.db_path.clone(),
            config,
        })
    }

    pub fn run(&mut self, src: &str, out: &mut impl Write) -> io::Result<Flow> {
        let src = src.trim();
        if src.starts_with('.') {
            return self.run_meta(parse_meta_command(src), out);
        }

        match prepare_statement(src) {
            Ok(statement) => match self.execute_statement(&statement, out) {
                Ok(()) => writeln!(out, "Executed.")?,
                Err(DbError::TableFull) => writeln!(out, "Error: Table full.")?,
                Err(DbError::DuplicateKey { .. }) => writeln!(out, "Error: Duplicate key.")?,
                Err(err) => report(out, &err)?,
            },
            Err(PrepareError::UnrecognizedStatement) => {
                writeln!(out, "Unrecognized keyword at start of '{src}'.")?
            }
            Err(PrepareError::SyntaxError) => {
                writeln!(out, "Syntax error. Could not parse statement.")?
            }
            Err(PrepareError::ParseStringTooLong) => writeln!(out, "String is too long.")?,
            Err(PrepareError::ParseNegativeAge) => writeln!(out, "Age must be positive.")?,
            Err(PrepareError::ParseNulByte) => writeln!(out, "String contains a NUL byte.")?,
        }
        Ok(Flow::Continue)
    }

    fn execute_statement(&mut self, statement: &Statement, out: &mut impl Write) -> Result<()> {
        match statement {
            Statement::Insert(row) => self.table.insert(row),
            Statement::Select => print_rows(out, &self.table.select_all()?),
        }
    }

    fn run_meta(&mut self, command: MetaCommand, out: &mut impl Write) -> io::Result<Flow> {
        let result = match command {
            MetaCommand::Exit => {
                self.table.free();
                writeln!(out, "Bye~")?;
                return Ok(Flow::Exit);
            }
            MetaCommand::Unrecognized(cmd) => {
                writeln!(out, "Unrecognized command {cmd}")?;
                return Ok(Flow::Continue);
            }
            MetaCommand::SyntaxError => {
                writeln!(out, "Syntax error. Could not parse statement.")?;
                return Ok(Flow::Continue);
            }
            MetaCommand::Page { size, offset } => self.page(size, offset, out),
            MetaCommand::Paginate { size } => {
                self.paginate(size.unwrap_or(self.config.page_size), out)
            }
            MetaCommand::Batch { size } => {
                self.batch(size.unwrap_or(self.config.batch_size), out)
            }
            MetaCommand::Average => self.average(out),
            MetaCommand::Concurrent => self.concurrent(out),
            MetaCommand::Seed { path } => self.seed(&path, out),
        };
        if let Err(err) = result {
            report(out, &err)?;
        }
        Ok(Flow::Continue)
    }

    fn page(&self, size: usize, offset: usize, out: &mut impl Write) -> Result<()> {
        if size == 0 {
            return Err(DbError::InvalidPageSize);
        }
        print_rows(out, &paginate_users(&self.path, size, offset)?)
    }

    fn paginate(&self, size: usize, out: &mut impl Write) -> Result<()> {
        let mut pages = lazy_paginate(&self.path, size)?;
        let mut number = 1;
        loop {
            let offset = pages.offset();
            let Some(page) = pages.next() else {
                break;
            };
            let page = page?;
            writeln!(out, "-- page {number} (offset {})", offset.unwrap_or_default())?;
            print_rows(out, &page)?;
            number += 1;
        }
        Ok(())
    }

    fn batch(&self, size: usize, out: &mut impl Write) -> Result<()> {
        for row in batch_processing(&self.path, size, self.config.min_age)? {
            writeln!(out, "{}", row?)?;
        }
        Ok(())
    }

    fn average(&self, out: &mut impl Write) -> Result<()> {
        match calculate_average_age(&self.path)? {
            Some(average) => writeln!(out, "Average age of users: {average:.1}")?,
            None => writeln!(out, "No users found to calculate the average age.")?,
        }
        Ok(())
    }

    fn seed(&mut self, path: &str, out: &mut impl Write) -> Result<()> {
        let report = self.table.seed_csv(path)?;
        writeln!(
            out,
            "Seeded {} rows, skipped {} existing.",
            report.inserted, report.skipped
        )?;
        Ok(())
    }

    fn concurrent(&self, out: &mut impl Write) -> Result<()> {
        let fetched = fetch_concurrently(&self.path, self.config.older_than)?;
        writeln!(out, "All users:")?;
        print_rows(out, &fetched.all)?;
        writeln!(out)?;
        writeln!(out, "Users older than {}:", self.config.older_than)?;
        print_rows(out, &fetched.older)
    }
}

fn print_rows(out: &mut impl Write, rows: &[Row]) -> Result<()> {
    for row in rows {
        writeln!(out, "{row}")?;
    }
    Ok(())
}

fn report(out: &mut impl Write, err: &DbError) -> io::Result<()> {
    tracing::warn!(error = %err, "command failed");
    writeln!(out, "Error: {err}.")
}
