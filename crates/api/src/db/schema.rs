//! Static declarations of the tables the service reads.
//!
//! The dataset is populated externally, so instead of discovering tables at
//! runtime every query is written against these layouts and the layouts are
//! checked against the live database once at startup.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// Daily readings, one row per station per reported day
pub const MEASUREMENT: TableSchema = TableSchema {
    name: "measurement",
    columns: &["station", "date", "prcp", "tobs"],
};

/// Station metadata, one row per station
pub const STATION: TableSchema = TableSchema {
    name: "station",
    columns: &["station", "name", "latitude", "longitude", "elevation"],
};

pub const TABLES: [TableSchema; 2] = [MEASUREMENT, STATION];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("table `{table}` does not match the expected layout, missing columns: {}", .missing.join(", "))]
pub struct SchemaMismatch {
    pub table: String,
    pub missing: Vec<String>,
}

impl TableSchema {
    /// Compares the declared columns against the ones reported by the database.
    /// Column names are matched case-insensitively, the way SQLite resolves them.
    pub fn check_columns<S: AsRef<str>>(&self, present: &[S]) -> Result<(), SchemaMismatch> {
        let missing: Vec<String> = self
            .columns
            .iter()
            .filter(|column| {
                !present
                    .iter()
                    .any(|found| found.as_ref().eq_ignore_ascii_case(column))
            })
            .map(|column| column.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaMismatch {
                table: self.name.to_string(),
                missing,
            })
        }
    }
}
