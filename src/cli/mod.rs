//! Command-line interface for opossum-rs

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "opossum")]
#[command(version)]
#[command(about = "TFBS over-representation analysis in Rust")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the combined over-representation analysis
    #[command(
        about = "Run the combined over-representation analysis",
        long_about = "Run the combined over-representation analysis\n\n\
            Scores every TF profile shared by the target and background count\n\
            matrices with a continuity-corrected z-score and a one-tailed Fisher\n\
            exact test, optionally adds a Kolmogorov-Smirnov comparison of site\n\
            positional distributions, and writes one ranked results table.",
        after_long_help = "\
Examples:
  # Z-score + Fisher, ranked by z-score
  opossum analyze -t target_counts.tsv -b background_counts.tsv \\
    --tf-info tf_info.tsv --target-length 100000 --bg-length 200000 \\
    --sort-by zscore --reverse -o results.tsv

  # Top 10 results above a Fisher score cutoff
  opossum analyze -t target_counts.tsv -b background_counts.tsv \\
    --tf-info tf_info.tsv --target-length 100000 --bg-length 200000 \\
    --sort-by fisher_score --reverse --fisher-cutoff 7 --num-results 10

  # With a two-sample KS test on site positions
  opossum analyze -t target_counts.tsv -b background_counts.tsv \\
    --tf-info tf_info.tsv --target-length 100000 --bg-length 200000 \\
    --target-values target_positions.tsv --bg-values background_positions.tsv

  # One-sample KS against a uniform positional distribution
  opossum analyze -t target_counts.tsv -b background_counts.tsv \\
    --tf-info tf_info.tsv --target-length 100000 --bg-length 200000 \\
    --target-values target_positions.tsv --ks-reference uniform:-2000:2000"
    )]
    Analyze {
        /// Path to the target counts matrix
        #[arg(short, long,
            long_help = "Path to the target counts matrix.\n\
                Format: first column = gene/entity IDs, header row = TF profile IDs,\n\
                cells = site hit counts. CSV or TSV (auto-detected).")]
        target: String,

        /// Path to the background counts matrix
        #[arg(short, long,
            long_help = "Path to the background counts matrix.\n\
                Same format as the target matrix; the TF ID universe must match\n\
                the target matrix exactly.")]
        background: String,

        /// Path to the TF profile metadata file
        #[arg(long, value_name = "FILE",
            long_help = "Path to the TF profile metadata file.\n\
                Columns: id, name, class, family, width. The width column supplies\n\
                the profile footprint used by the z-score; name/class/family\n\
                annotate the results table.")]
        tf_info: String,

        /// Total nucleotides searched in the target set
        #[arg(long, value_name = "BP")]
        target_length: u64,

        /// Total nucleotides searched in the background set
        #[arg(long, value_name = "BP")]
        bg_length: u64,

        /// Target site positions for KS analysis
        #[arg(long, value_name = "FILE",
            long_help = "Target site positions for KS analysis.\n\
                Long format: entity_id, tf_id, value (one site per row).\n\
                Enables the KS test when given.")]
        target_values: Option<String>,

        /// Background site positions for the two-sample KS test
        #[arg(long, value_name = "FILE", conflicts_with = "ks_reference")]
        bg_values: Option<String>,

        /// Named reference distribution for the one-sample KS test
        #[arg(long, value_name = "DIST", conflicts_with = "bg_values",
            long_help = "Named reference distribution for the one-sample KS test.\n\
                Supported: uniform (unit interval) or uniform:<min>:<max>.")]
        ks_reference: Option<String>,

        /// Output file path [default: opossum_results.tsv]
        #[arg(short, long, default_value = "opossum_results.tsv")]
        output: String,

        /// Write JSON instead of TSV
        #[arg(long)]
        json: bool,

        /// Sort field for the results table [default: id]
        #[arg(long, default_value = "id",
            long_help = "Sort field for the results table.\n\
                One of: id, zscore, zscore_pvalue, fisher_score, ks_score,\n\
                target_hits, bg_hits, target_gene_hits, bg_gene_hits.")]
        sort_by: String,

        /// Reverse the sort order (descending for numeric fields)
        #[arg(long)]
        reverse: bool,

        /// Number of results to keep, or 'all' [default: all]
        #[arg(long, default_value = "all")]
        num_results: String,

        /// Retain only results with z-score >= this cutoff
        #[arg(long, value_name = "Z")]
        zscore_cutoff: Option<f64>,

        /// Retain only results with Fisher score (-ln p) >= this cutoff
        #[arg(long, value_name = "SCORE")]
        fisher_cutoff: Option<f64>,
    },
}
