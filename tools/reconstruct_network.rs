// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Effective Network Reconstruction Tool

Rebuilds the effective network of one inference run and prints its
layer-by-layer aggregates.

Usage:
  cargo run --bin reconstruct_network -- --subject m03 --repeat 2

Configuration comes from `tenet_configuration.toml` (searched upward from
the working directory, or set TENET_CONFIG_PATH); every setting can be
overridden on the command line.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::Context;

use tenet::config::{load_config, validate_config};
use tenet::observability::{debug_flags_help, init_logging, parse_debug_flags};
use tenet::reconstruction::pipeline::run_full_analysis;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut cli_args: HashMap<String, String> = HashMap::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage(&args[0]);
                return Ok(());
            }
            "--config" => config_path = Some(PathBuf::from(take_value(&args, &mut i)?)),
            "--subject" => {
                cli_args.insert("subject".to_string(), take_value(&args, &mut i)?);
            }
            "--repeat" => {
                cli_args.insert("repeat".to_string(), take_value(&args, &mut i)?);
            }
            "--layer-scheme" => {
                cli_args.insert("layer_scheme".to_string(), take_value(&args, &mut i)?);
            }
            "--data-dir" => {
                cli_args.insert("data_dir".to_string(), take_value(&args, &mut i)?);
            }
            "--results-dir" => {
                cli_args.insert("results_dir".to_string(), take_value(&args, &mut i)?);
            }
            "--significance-threshold" => {
                cli_args.insert(
                    "significance_threshold".to_string(),
                    take_value(&args, &mut i)?,
                );
            }
            "--serial" => {
                cli_args.insert("parallel".to_string(), "false".to_string());
            }
            "--log-level" => {
                cli_args.insert("log_level".to_string(), take_value(&args, &mut i)?);
            }
            flag if flag.starts_with("--debug") => {
                // Consumed by parse_debug_flags below.
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage(&args[0]);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let debug_flags = parse_debug_flags();
    let config =
        load_config(config_path.as_deref(), Some(&cli_args)).context("loading configuration")?;
    validate_config(&config).context("validating configuration")?;
    init_logging(&config.logging.level, &debug_flags)?;
    tracing::debug!(target: "tenet", "Effective configuration: {:?}", config);

    println!("🧠 Tenet Effective Network Reconstruction");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Subject: {}", config.run.subject);
    println!("📂 Repeat:  {}", config.run.repeat);
    println!();

    let report = run_full_analysis(&config)?;
    let network = &report.network;
    let pairwise = &report.pairwise;

    println!(
        "Scheme: {} ({} layers)",
        network.scheme,
        network.scheme.layer_count()
    );
    println!(
        "Artifacts: {} scanned ({} with a result, {} empty, {} unreadable)",
        network.tally.scanned,
        network.tally.present,
        network.tally.empty,
        network.tally.unreadable
    );
    println!(
        "Edges: {} directed ({} in-layer, {} cross-layer)",
        network.network.edge_count(),
        network.network.in_layer_edges().count(),
        network.network.cross_layer_edges().count()
    );
    println!();

    println!("Directed edges per layer pair:");
    println!("{}", network.edge_counts);
    println!("Possible links per layer pair:");
    println!("{}", network.possible_links);
    println!("Proportion of possible links realized:");
    println!("{}", network.edge_proportion);

    println!("Degree sums per layer:");
    for summary in &network.degree_summaries {
        println!(
            "  {:>12}  in {:>6}  out {:>6}  in/out {}",
            summary.layer.display_name(),
            summary.in_degree_sum,
            summary.out_degree_sum,
            summary.in_out_ratio
        );
    }
    println!();

    println!("Pairwise comparisons tested:");
    println!("{}", pairwise.tested_counts);
    println!("Significant comparisons:");
    println!("{}", pairwise.significant_counts);
    println!("Proportion significant:");
    println!("{}", pairwise.significant_proportion);
    println!("Mean transfer rate (corrected):");
    println!("{}", pairwise.mean_rate);
    println!("Mean transfer per source spike:");
    println!("{}", pairwise.mean_per_source_spike);
    println!("Mean transfer per target spike:");
    println!("{}", pairwise.mean_per_target_spike);
    println!(
        "Average observation window: {:.2} min",
        pairwise.mean_window_minutes()
    );

    let warning_count = network.warnings.len() + pairwise.warnings.len();
    if warning_count > 0 {
        println!();
        println!("⚠️  {} warnings (see log output above)", warning_count);
    }

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ Reconstruction complete");

    Ok(())
}

fn take_value(args: &[String], i: &mut usize) -> anyhow::Result<String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("missing value after {}", args[*i - 1]))
}

fn print_usage(program: &str) {
    println!("Usage: {} [OPTIONS]", program);
    println!();
    println!("Options:");
    println!("  --config <path>                  Configuration file to load");
    println!("  --subject <id>                   Subject to reconstruct, e.g. m03");
    println!("  --repeat <n>                     Inference repeat to scan (from 1)");
    println!("  --layer-scheme <name>            auto | cortical | cortical-thalamic");
    println!("  --data-dir <path>                Root of the recording data tree");
    println!("  --results-dir <path>             Root of the inference result tree");
    println!("  --significance-threshold <p>     Pairwise significance cutoff");
    println!("  --serial                         Disable parallel artifact parsing");
    println!("  --log-level <level>              trace | debug | info | warn | error");
    println!("  -h, --help                       Show this help");
    println!();
    println!("{}", debug_flags_help());
}
