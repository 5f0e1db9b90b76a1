//! Readers for count matrices, positional values, and TF profile metadata
//!
//! All readers accept tab- or comma-delimited files; the delimiter is
//! detected from the header line.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;

use crate::data::{CountsTable, ValuesTable};
use crate::error::{OpossumError, Result};

/// Per-TF profile metadata used for z-score widths and report columns
#[derive(Debug, Clone, Deserialize)]
pub struct TfInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub family: String,
    pub width: u32,
}

fn detect_delimiter<P: AsRef<Path>>(path: P) -> Result<u8> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = String::new();
    reader.read_line(&mut header)?;
    if header.trim().is_empty() {
        return Err(OpossumError::EmptyData {
            reason: "empty input file".to_string(),
        });
    }
    Ok(if header.contains('\t') { b'\t' } else { b',' })
}

/// Read a counts matrix: first column entity IDs, header row TF IDs
pub fn read_counts_table<P: AsRef<Path>>(path: P) -> Result<CountsTable> {
    let delimiter = detect_delimiter(&path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_path(&path)?;

    let tf_ids: Vec<String> = reader
        .headers()?
        .iter()
        .skip(1)
        .map(|s| s.trim().to_string())
        .collect();
    if tf_ids.is_empty() {
        return Err(OpossumError::InvalidTable {
            reason: "counts matrix header has no TF columns".to_string(),
        });
    }

    let mut table = CountsTable::new();
    for record in reader.records() {
        let record = record?;
        if record.len() != tf_ids.len() + 1 {
            return Err(OpossumError::InvalidTable {
                reason: format!(
                    "row has {} columns, expected {}",
                    record.len(),
                    tf_ids.len() + 1
                ),
            });
        }

        let entity_id = record[0].trim().to_string();
        for (tf_id, field) in tf_ids.iter().zip(record.iter().skip(1)) {
            let count: u32 =
                field
                    .trim()
                    .parse()
                    .map_err(|_| OpossumError::InvalidTable {
                        reason: format!(
                            "invalid count '{}' for ({entity_id}, {tf_id})",
                            field.trim()
                        ),
                    })?;
            table.set_count(&entity_id, tf_id, count);
        }
    }

    if table.num_entities() == 0 {
        return Err(OpossumError::EmptyData {
            reason: "no entity rows in counts matrix".to_string(),
        });
    }

    Ok(table)
}

/// Read positional observations in long format: entity_id, tf_id, value
/// (one observation per row, header required)
pub fn read_values_table<P: AsRef<Path>>(path: P) -> Result<ValuesTable> {
    let delimiter = detect_delimiter(&path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_path(&path)?;

    let mut table = ValuesTable::new();
    for record in reader.records() {
        let record = record?;
        if record.len() < 3 {
            return Err(OpossumError::InvalidTable {
                reason: format!("values row has {} columns, expected 3", record.len()),
            });
        }
        let value: f64 = record[2]
            .trim()
            .parse()
            .map_err(|_| OpossumError::InvalidTable {
                reason: format!("invalid value '{}'", record[2].trim()),
            })?;
        // f64 parsing admits NaN/inf, which would poison the KS samples
        if !value.is_finite() {
            return Err(OpossumError::InvalidTable {
                reason: format!(
                    "non-finite value '{}' for ({}, {})",
                    record[2].trim(),
                    record[0].trim(),
                    record[1].trim()
                ),
            });
        }
        table.append_value(record[0].trim(), record[1].trim(), value);
    }

    Ok(table)
}

/// Read TF profile metadata: id, name, class, family, width
pub fn read_tf_info<P: AsRef<Path>>(path: P) -> Result<Vec<TfInfo>> {
    let delimiter = detect_delimiter(&path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_path(&path)?;

    let mut infos = Vec::new();
    for record in reader.deserialize() {
        let info: TfInfo = record?;
        infos.push(info);
    }

    if infos.is_empty() {
        return Err(OpossumError::EmptyData {
            reason: "no TF profiles in metadata file".to_string(),
        });
    }

    Ok(infos)
}

/// Profile widths keyed by TF ID, as the z-score scorer expects
pub fn widths_from(infos: &[TfInfo]) -> HashMap<String, u32> {
    infos.iter().map(|i| (i.id.clone(), i.width)).collect()
}

/// TF metadata keyed by ID, for report annotation
pub fn info_map(infos: Vec<TfInfo>) -> HashMap<String, TfInfo> {
    infos.into_iter().map(|i| (i.id.clone(), i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_counts_matrix_tsv() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "gene_id\tMA0001\tMA0002").unwrap();
        writeln!(file, "gene1\t3\t0").unwrap();
        writeln!(file, "gene2\t0\t2").unwrap();

        let table = read_counts_table(file.path()).unwrap();
        assert_eq!(table.num_entities(), 2);
        assert_eq!(table.num_tfs(), 2);
        assert_eq!(table.get_count("gene1", "MA0001"), 3);
        assert_eq!(table.get_count("gene2", "MA0002"), 2);
        assert!(table.has_pair("gene1", "MA0002"));
    }

    #[test]
    fn test_read_counts_matrix_csv_delimiter_detected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "gene_id,MA0001").unwrap();
        writeln!(file, "gene1,7").unwrap();

        let table = read_counts_table(file.path()).unwrap();
        assert_eq!(table.get_count("gene1", "MA0001"), 7);
    }

    #[test]
    fn test_invalid_count_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "gene_id\tMA0001").unwrap();
        writeln!(file, "gene1\t-2").unwrap();
        assert!(read_counts_table(file.path()).is_err());
    }

    #[test]
    fn test_read_values_long_format() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "entity_id\ttf_id\tvalue").unwrap();
        writeln!(file, "gene1\tMA0001\t-120.5").unwrap();
        writeln!(file, "gene1\tMA0001\t33.0").unwrap();
        writeln!(file, "gene2\tMA0001\t10.0").unwrap();

        let table = read_values_table(file.path()).unwrap();
        assert_eq!(table.values("gene1", "MA0001"), &[-120.5, 33.0]);
        assert_eq!(table.all_values("MA0001").len(), 3);
    }

    #[test]
    fn test_non_finite_values_rejected() {
        for bad in ["NaN", "inf", "-inf"] {
            let mut file = NamedTempFile::new().unwrap();
            writeln!(file, "entity_id\ttf_id\tvalue").unwrap();
            writeln!(file, "gene1\tMA0001\t{bad}").unwrap();
            writeln!(file, "gene2\tMA0001\t10.0").unwrap();

            let err = read_values_table(file.path()).unwrap_err();
            assert!(
                matches!(err, OpossumError::InvalidTable { .. }),
                "expected InvalidTable for '{bad}', got {err}"
            );
        }
    }

    #[test]
    fn test_read_tf_info() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "id\tname\tclass\tfamily\twidth").unwrap();
        writeln!(file, "MA0001\tAGL3\tMADS\tMADS\t10").unwrap();
        writeln!(file, "MA0002\tRUNX1\tRunt\tRunt\t11").unwrap();

        let infos = read_tf_info(file.path()).unwrap();
        assert_eq!(infos.len(), 2);

        let widths = widths_from(&infos);
        assert_eq!(widths["MA0001"], 10);
        assert_eq!(widths["MA0002"], 11);

        let map = info_map(infos);
        assert_eq!(map["MA0002"].name, "RUNX1");
    }

    #[test]
    fn test_empty_file_rejected() {
        let file = NamedTempFile::new().unwrap();
        assert!(read_counts_table(file.path()).is_err());
    }
}
