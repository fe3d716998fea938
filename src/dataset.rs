//! CSV dataset loading for the training pipeline

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// A single parsed CSV cell.
///
/// Numbers are parsed eagerly; anything non-numeric stays text so the
/// preprocessor can label-encode it. Empty cells are treated as missing.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Cell::Missing
        } else if let Ok(n) = trimmed.parse::<f64>() {
            // NaN/inf cells behave like blanks: dropped with the row.
            if n.is_finite() {
                Cell::Number(n)
            } else {
                Cell::Missing
            }
        } else {
            Cell::Text(trimmed.to_string())
        }
    }
}

/// An in-memory tabular dataset: named columns over row-major cells.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Load a dataset from a CSV file with a header row.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open dataset file {}", path.display()))?;
        let dataset = Self::from_csv_reader(file)?;
        info!(
            path = %path.display(),
            rows = dataset.rows.len(),
            columns = dataset.columns.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Load a dataset from any CSV reader with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()
            .context("Failed to read CSV header")?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record.context("Failed to read CSV record")?;
            rows.push(record.iter().map(Cell::parse).collect());
        }

        Ok(Self { columns, rows })
    }

    /// Number of rows in the dataset.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Drop the named columns where they exist. Returns how many were dropped.
    pub fn drop_columns(&mut self, names: &[&str]) -> usize {
        let mut dropped = 0;
        for name in names {
            if let Some(idx) = self.column_index(name) {
                self.columns.remove(idx);
                for row in &mut self.rows {
                    row.remove(idx);
                }
                dropped += 1;
            }
        }
        dropped
    }

    /// Drop rows containing any missing cell. Returns how many were dropped.
    pub fn drop_missing_rows(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| !row.iter().any(|c| *c == Cell::Missing));
        before - self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
amount,kind,label
10.5,debit,0
,credit,1
3,debit,0
";

    #[test]
    fn test_parse_cells() {
        assert_eq!(Cell::parse("3.25"), Cell::Number(3.25));
        assert_eq!(Cell::parse(" 7 "), Cell::Number(7.0));
        assert_eq!(Cell::parse("True"), Cell::Text("True".to_string()));
        assert_eq!(Cell::parse(""), Cell::Missing);
        assert_eq!(Cell::parse("   "), Cell::Missing);
    }

    #[test]
    fn test_from_csv_reader() {
        let dataset = Dataset::from_csv_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.columns, vec!["amount", "kind", "label"]);
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.rows[0][0], Cell::Number(10.5));
        assert_eq!(dataset.rows[0][1], Cell::Text("debit".to_string()));
        assert_eq!(dataset.rows[1][0], Cell::Missing);
    }

    #[test]
    fn test_drop_columns_and_missing_rows() {
        let mut dataset = Dataset::from_csv_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(dataset.drop_columns(&["kind", "not_there"]), 1);
        assert_eq!(dataset.columns, vec!["amount", "label"]);

        assert_eq!(dataset.drop_missing_rows(), 1);
        assert_eq!(dataset.len(), 2);
        assert!(dataset
            .rows
            .iter()
            .all(|row| row.iter().all(|c| *c != Cell::Missing)));
    }
}
