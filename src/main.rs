//! opossum-rs command-line interface

use clap::Parser;
use log::{info, LevelFilter};

use opossum_rs::cli::{Cli, Commands};
use opossum_rs::prelude::*;

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Analyze {
            target,
            background,
            tf_info,
            target_length,
            bg_length,
            target_values,
            bg_values,
            ks_reference,
            output,
            json,
            sort_by,
            reverse,
            num_results,
            zscore_cutoff,
            fisher_cutoff,
        } => run_analyze(AnalyzeArgs {
            target,
            background,
            tf_info,
            target_length,
            bg_length,
            target_values,
            bg_values,
            ks_reference,
            output,
            json,
            sort_by,
            reverse,
            num_results,
            zscore_cutoff,
            fisher_cutoff,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

struct AnalyzeArgs {
    target: String,
    background: String,
    tf_info: String,
    target_length: u64,
    bg_length: u64,
    target_values: Option<String>,
    bg_values: Option<String>,
    ks_reference: Option<String>,
    output: String,
    json: bool,
    sort_by: String,
    reverse: bool,
    num_results: String,
    zscore_cutoff: Option<f64>,
    fisher_cutoff: Option<f64>,
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    // resolve list options up front so bad flags fail before any work
    let options = ListOptions {
        sort_by: Some(args.sort_by.parse::<SortKey>()?),
        reverse: args.reverse,
        num_results: args.num_results.parse::<ResultCount>()?,
        zscore_cutoff: args.zscore_cutoff,
        fisher_cutoff: args.fisher_cutoff,
    };

    info!("Reading target counts from {}", args.target);
    let target = read_counts_table(&args.target)?;
    info!("Reading background counts from {}", args.background);
    let background = read_counts_table(&args.background)?;
    info!(
        "Target: {} entities, background: {} entities, {} TF profiles",
        target.num_entities(),
        background.num_entities(),
        target.num_tfs()
    );

    let tf_info = read_tf_info(&args.tf_info)?;
    let tf_widths = widths_from(&tf_info);

    let target_values = args
        .target_values
        .as_deref()
        .map(read_values_table)
        .transpose()?;
    let bg_values = args
        .bg_values
        .as_deref()
        .map(read_values_table)
        .transpose()?;
    let ks_reference = args
        .ks_reference
        .as_deref()
        .map(str::parse::<ReferenceDistribution>)
        .transpose()?;

    let ks = match (&target_values, &bg_values, ks_reference) {
        (Some(target), Some(background), None) => Some(KsInput::Data { background, target }),
        (Some(target), None, Some(distribution)) => Some(KsInput::Reference {
            distribution,
            target,
        }),
        (None, None, None) => None,
        _ => {
            return Err(OpossumError::InvalidInput {
                reason: "KS analysis needs --target-values plus either --bg-values or --ks-reference"
                    .to_string(),
            })
        }
    };

    let inputs = AnalysisInputs {
        background: &background,
        target: &target,
        bg_total_length: args.bg_length,
        t_total_length: args.target_length,
        tf_widths: &tf_widths,
        ks,
    };
    let results = run_analysis(&inputs)?;

    let list = results.get_list(&options);
    info!(
        "Writing {} of {} scored TF profiles to {}",
        list.len(),
        results.len(),
        args.output
    );

    if args.json {
        write_results_json(&args.output, &list)?;
    } else {
        let annotations = info_map(tf_info);
        write_results(&args.output, &list, Some(&annotations))?;
    }

    Ok(())
}
