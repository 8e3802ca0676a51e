use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use oig_enforcement::storage::{StorageError, output_file_name};
use oig_enforcement::{DEFAULT_START_MONTH, DEFAULT_START_YEAR, load_and_classify};
use oig_enforcement_cli::{LogLevel, init_logging};

#[derive(Parser)]
#[command(name = "oig-classify")]
#[command(about = "Classify and summarise a collected enforcement actions file", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[arg(help = "CSV file written by oig-collect")]
    path: Option<PathBuf>,

    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value = "text",
        help = "Output format"
    )]
    format: OutputFormat,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let path = cli.path.unwrap_or_else(|| {
        PathBuf::from(output_file_name(DEFAULT_START_YEAR, DEFAULT_START_MONTH))
    });

    let table = load_and_classify(&path).unwrap_or_else(|e| {
        match e {
            StorageError::NotFound(_) => log::error!("CSV file not found: {}", path.display()),
            e => log::error!("Failed to load {}: {}", path.display(), e),
        }
        process::exit(1);
    });

    let report = table.report();

    match cli.format {
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Error serializing to JSON: {}", e);
                process::exit(1);
            }
        },
        OutputFormat::Text => {
            println!("Loaded {} ({} records)\n", path.display(), table.len());
            println!("{}", report);
        }
    }
}
