use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::{DbError, Result};
use crate::row::Row;
use crate::table::Table;

/// One line of a seed file. `user_id` is optional; a fresh UUID is used
/// when the column is missing or empty.
#[derive(Debug, Deserialize)]
struct SeedRecord {
    #[serde(default)]
    user_id: Option<String>,
    name: String,
    email: String,
    age: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

impl Table {
    /// Bulk-loads `name,email,age[,user_id]` rows from a CSV file with a
    /// header line. Rows whose `user_id` is already stored are skipped.
    pub fn seed_csv(&mut self, path: impl AsRef<Path>) -> Result<SeedReport> {
        let path = path.as_ref();
        let report = self.seed_from_reader(File::open(path)?)?;
        tracing::info!(
            path = %path.display(),
            inserted = report.inserted,
            skipped = report.skipped,
            "seeded table"
        );
        Ok(report)
    }

    pub fn seed_from_reader<R: Read>(&mut self, reader: R) -> Result<SeedReport> {
        let mut records = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut report = SeedReport::default();
        for record in records.deserialize::<SeedRecord>() {
            let record = record?;
            let user_id = match record.user_id.filter(|id| !id.is_empty()) {
                Some(id) => id,
                None => Uuid::new_v4().to_string(),
            };
            let row = Row::new(&user_id, &record.name, &record.email, parse_age(&record.age)?)?;
            match self.insert(&row) {
                Ok(()) => report.inserted += 1,
                Err(DbError::DuplicateKey { .. }) => report.skipped += 1,
                Err(err) => return Err(err),
            }
        }
        Ok(report)
    }
}

// the source column is DECIMAL(5,2); whole years are kept
fn parse_age(raw: &str) -> Result<u32> {
    let age: f64 = raw.parse().map_err(|_| DbError::InvalidAge(raw.to_string()))?;
    if !age.is_finite() || age < 0.0 || age > f64::from(u32::MAX) {
        return Err(DbError::InvalidAge(raw.to_string()));
    }
    Ok(age.round() as u32)
}
