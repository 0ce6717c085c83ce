// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::errors::{SampleError, SampleResult};

/// Solver history table, addressed by exact header text.
///
/// The solver separates fields with `", "`, so headers keep their leading
/// space (`" I_th [A]"`) and cells are trimmed only when parsed as numbers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl OutputTable {
    pub fn from_reader<R: Read>(reader: R) -> SampleResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::None)
            .from_reader(reader);

        let headers = csv_reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn from_path(path: &Path) -> SampleResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Parse every cell of column `name` as `f64`.
    pub fn column(&self, name: &str) -> SampleResult<Vec<f64>> {
        let index = self
            .column_index(name)
            .ok_or_else(|| SampleError::MissingColumn(name.to_string()))?;

        self.rows
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                let cell = cells.get(index).map(|c| c.trim()).unwrap_or_default();
                cell.parse::<f64>().map_err(|_| SampleError::InvalidValue {
                    column: name.to_string(),
                    row,
                    value: cell.to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORY: &str = "time, I_th [A], T_core [deg C], time_to_overheat [s]\n\
                           0, 812.5, 41.2, 3600\n\
                           30, 790.0, 43.9, 1800.5\n";

    #[test]
    fn headers_keep_their_leading_space() {
        let table = OutputTable::from_reader(HISTORY.as_bytes()).unwrap();
        assert_eq!(table.headers()[1], " I_th [A]");
        assert_eq!(table.column_index("I_th [A]"), None);
        assert_eq!(table.column_index(" I_th [A]"), Some(1));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn columns_parse_trimmed_cells() {
        let table = OutputTable::from_reader(HISTORY.as_bytes()).unwrap();
        assert_eq!(table.column("time").unwrap(), vec![0.0, 30.0]);
        assert_eq!(table.column(" time_to_overheat [s]").unwrap(), vec![3600.0, 1800.5]);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let table = OutputTable::from_reader(HISTORY.as_bytes()).unwrap();
        match table.column(" ampacity") {
            Err(SampleError::MissingColumn(name)) => assert_eq!(name, " ampacity"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn non_numeric_cell_is_an_invalid_value() {
        let data = "time, I_th [A]\n0, nope\n";
        let table = OutputTable::from_reader(data.as_bytes()).unwrap();
        match table.column(" I_th [A]") {
            Err(SampleError::InvalidValue { row, value, .. }) => {
                assert_eq!(row, 0);
                assert_eq!(value, "nope");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn ragged_rows_are_malformed() {
        let data = "time, I_th [A]\n0, 1.0, 2.0\n";
        assert!(matches!(
            OutputTable::from_reader(data.as_bytes()),
            Err(SampleError::Csv(_))
        ));
    }

    #[test]
    fn header_only_table_is_empty() {
        let table = OutputTable::from_reader("time, I_th [A]\n".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column(" I_th [A]").unwrap(), Vec::<f64>::new());
    }
}
