//! Results writers
//!
//! Writes the sorted, filtered result list produced by `get_list`. Absent
//! values render as `NA`, kept distinct from a computed value of zero.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::io::tables::TfInfo;
use crate::results::ScoreResult;

fn na_u64(v: Option<u64>) -> String {
    v.map_or_else(|| "NA".to_string(), |x| x.to_string())
}

fn na_fixed(v: Option<f64>) -> String {
    v.map_or_else(|| "NA".to_string(), |x| format!("{x:.4}"))
}

fn na_sci(v: Option<f64>) -> String {
    v.map_or_else(|| "NA".to_string(), |x| format!("{x:.4e}"))
}

/// Write results as a tab-delimited table, in list order
pub fn write_results<P: AsRef<Path>>(
    path: P,
    results: &[ScoreResult],
    tf_info: Option<&HashMap<String, TfInfo>>,
) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(
        out,
        "tf_id\tname\tclass\tfamily\ttarget_gene_hits\ttarget_gene_no_hits\t\
         bg_gene_hits\tbg_gene_no_hits\ttarget_hits\tbg_hits\ttarget_rate\tbg_rate\t\
         zscore\tzscore_pvalue\tfisher_score\tks_score\tks_background"
    )?;

    for r in results {
        let (name, class, family) = match tf_info.and_then(|m| m.get(&r.id)) {
            Some(info) => (info.name.as_str(), info.class.as_str(), info.family.as_str()),
            None => ("NA", "NA", "NA"),
        };

        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.id,
            name,
            class,
            family,
            na_u64(r.target_gene_hits),
            na_u64(r.target_gene_no_hits),
            na_u64(r.bg_gene_hits),
            na_u64(r.bg_gene_no_hits),
            na_u64(r.target_hits),
            na_u64(r.bg_hits),
            na_sci(r.target_rate),
            na_sci(r.bg_rate),
            na_fixed(r.zscore),
            na_sci(r.zscore_pvalue),
            na_fixed(r.fisher_score),
            na_fixed(r.ks_score),
            r.ks_background.as_deref().unwrap_or("NA"),
        )?;
    }

    Ok(())
}

/// Write results as JSON, in list order
pub fn write_results_json<P: AsRef<Path>>(path: P, results: &[ScoreResult]) -> Result<()> {
    let out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(out, results)?;
    Ok(())
}
