//! Tabular input readers and results writers

mod report;
mod tables;

pub use report::{write_results, write_results_json};
pub use tables::{info_map, read_counts_table, read_tf_info, read_values_table, widths_from, TfInfo};
