use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::Level;

use crate::config::{config_file_paths, load_config, ConfigOverrides};
use crate::reporting::{report, ReportOptions};
use bench_viewer_cli_types::{Cli, CliSource, Commands};

pub fn handle_calls() -> Result<()> {
    let cli = Cli::parse();
    let logger_level = match cli.verbose {
        0 => Level::Warn,
        1 => Level::Info,
        2 => Level::Debug,
        _ => Level::Trace,
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(logger_level.as_str())).init();

    match cli.command {
        Commands::Report {
            output,
            title,
            custom_css,
            template,
            filters,
            source,
        } => {
            let config = load_config(&ConfigOverrides::from(source))?;
            report(
                output,
                &config,
                ReportOptions {
                    title,
                    custom_css,
                    template,
                    filters,
                },
            )
        }
        Commands::Config { source } => show_config_info(source),
    }
}

/// Show the effective configuration and the config files consulted
fn show_config_info(source: CliSource) -> Result<()> {
    println!("Benchmark Viewer Configuration Information");
    println!("==========================================");

    for path in config_file_paths() {
        if path.exists() {
            println!("Config file: {} (exists)", path.display());
        } else {
            println!("Config file: {} (not found)", path.display());
        }
    }

    match load_config(&ConfigOverrides::from(source)) {
        Ok(config) => {
            println!("\nConfiguration loaded successfully");
            println!("  repository: {}", config.repository);
            println!("  branch: {}", config.branch);
            println!("  os_labels: {}", config.os_labels.join(", "));
            println!("  api_base_url: {}", config.api_base_url);
            println!("  file_extension: {}", config.file_extension);
            println!("  on_file_error: {}", config.on_file_error.as_str());
            println!(
                "  request_timeout_seconds: {}",
                config.request_timeout_seconds
            );
        }
        Err(e) => {
            println!("\nConfiguration: Error loading - {:#}", e);
        }
    }

    Ok(())
}
