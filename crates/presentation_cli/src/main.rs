//! Commute CLI
//!
//! Command-line interface for offline batches and administration.

#![allow(clippy::print_stdout)]

mod batch;

use std::{path::PathBuf, sync::Arc, time::Duration};

use application::{CommutePort, SpreadsheetPort};
use clap::{Parser, Subcommand};
use infrastructure::{
    AppConfig, BaiduCommuteAdapter, ExcelSpreadsheetAdapter, LogFormat, init_tracing,
};
use integration_baidu::KeyPool;

/// Commute CLI
#[derive(Parser)]
#[command(name = "commute-cli")]
#[command(author, version, about = "Batch commute calculator CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (optional, environment overrides apply)
    #[arg(short, long, default_value = "config", global = true)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute commutes for a workbook without the server
    ///
    /// Example: commute-cli compute addresses.xlsx --target 人民广场
    Compute {
        /// Input workbook (.xlsx or .xls) with an address column
        input: PathBuf,

        /// Target address every row commutes to
        #[arg(short, long)]
        target: String,

        /// Directory for the result workbook (defaults to storage.upload_dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Delete stored files older than the retention period
    Sweep {
        /// Maximum file age in hours (defaults to storage.max_file_age_hours)
        #[arg(long)]
        max_age_hours: Option<u64>,
    },

    /// Check server health (used by Docker healthcheck)
    Health {
        /// Server URL
        #[arg(short, long, default_value = "http://localhost:5000")]
        url: String,
    },

    /// Show configured API keys (masked) and their daily cap
    Keys,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Format endpoint URL
fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(log_filter_from_verbosity(cli.verbose), LogFormat::Text)?;

    let config = AppConfig::load_from(&cli.config)?;

    match cli.command {
        Commands::Compute {
            input,
            target,
            output_dir,
        } => {
            config
                .baidu
                .validate()
                .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

            let mut storage = config.storage.clone();
            if let Some(dir) = output_dir {
                storage.upload_dir = dir;
            }

            let commute: Arc<dyn CommutePort> =
                Arc::new(BaiduCommuteAdapter::new(&config.baidu.to_baidu_config())?);
            let spreadsheets: Arc<dyn SpreadsheetPort> =
                Arc::new(ExcelSpreadsheetAdapter::from_config(&storage)?);

            println!("🚌 Computing commutes to {target}...");
            let outcome =
                batch::run_batch_file(commute, spreadsheets, &storage.upload_dir, &input, &target)
                    .await?;

            println!("✅ Batch completed");
            println!("   📁 Result: {}", outcome.output.display());
            println!("   📊 Rows: {}", outcome.summary.total_processed);
            if outcome.summary.failed_rows > 0 {
                println!("   ⚠️  Failed rows: {}", outcome.summary.failed_rows);
            }
            println!("   ⏱️  Duration: {}ms", outcome.duration_ms);
        },

        Commands::Sweep { max_age_hours } => {
            let hours = max_age_hours.unwrap_or(config.storage.max_file_age_hours);
            let spreadsheets = ExcelSpreadsheetAdapter::from_config(&config.storage)?;

            let report = spreadsheets
                .sweep_old_files(Duration::from_secs(hours * 3600))
                .await?;

            println!(
                "🧹 Swept {}: {} scanned, {} removed, {} failed",
                config.storage.upload_dir.display(),
                report.scanned,
                report.removed,
                report.failed
            );
        },

        Commands::Health { url } => {
            let client = reqwest::Client::new();
            match client.get(endpoint_url(&url, "/health")).send().await {
                Ok(resp) if resp.status().is_success() => {
                    let body = resp.json::<serde_json::Value>().await?;
                    println!("✅ Healthy");
                    println!("{}", serde_json::to_string_pretty(&body)?);
                },
                Ok(resp) => {
                    println!("❌ Unhealthy: HTTP {}", resp.status());
                    std::process::exit(1);
                },
                Err(e) => {
                    println!("❌ Unhealthy: {e}");
                    std::process::exit(1);
                },
            }
        },

        Commands::Keys => {
            let keys = config.baidu.to_baidu_config().api_keys;
            if keys.is_empty() {
                println!("❌ No API keys configured");
                std::process::exit(1);
            }
            let pool = KeyPool::new(keys, config.baidu.daily_cap)?;

            println!("🔑 {} key(s) configured:", pool.len());
            for credential in pool.usage_snapshot() {
                println!(
                    "   {}  {}/{}",
                    credential.key, credential.usage, credential.daily_cap
                );
            }
        },
    }

    Ok(())
}
