use std::path::PathBuf;
use std::process;

use clap::Parser;
use oig_enforcement::{Collector, CollectorConfig, DEFAULT_START_MONTH, DEFAULT_START_YEAR};
use oig_enforcement_cli::{LogLevel, init_logging};

#[derive(Parser)]
#[command(name = "oig-collect")]
#[command(about = "Collect HHS OIG enforcement actions from a month to today", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[arg(
        long,
        default_value_t = DEFAULT_START_MONTH,
        value_parser = clap::value_parser!(u32).range(1..=12),
        help = "First month to collect"
    )]
    month: u32,

    #[arg(long, default_value_t = DEFAULT_START_YEAR, help = "Year of the first month to collect")]
    year: i32,

    #[arg(
        long,
        value_name = "DIR",
        default_value = ".",
        help = "Directory the CSV file is written to"
    )]
    output_dir: PathBuf,

    #[arg(
        long,
        default_value_t = oig_enforcement::MAX_PAGES,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Upper bound on listing pages to walk"
    )]
    max_pages: u32,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let rule = "=".repeat(70);
    println!("{}", rule);
    println!("HHS OIG Enforcement Actions Scraper");
    println!("{}\n", rule);

    let config = CollectorConfig {
        output_dir: cli.output_dir,
        max_pages: cli.max_pages,
        ..CollectorConfig::default()
    };

    let collector = Collector::web(config).unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });

    let collection = collector
        .collect(cli.month, cli.year)
        .await
        .unwrap_or_else(|e| {
            log::error!("{}", e);
            process::exit(1);
        });

    match collection {
        Some(collection) => {
            println!("\n{}", collection);
            println!("\nScraping complete.");
        }
        None => {
            println!("\nNo data collected.");
            println!("Scraping failed. Check error messages above.");
            process::exit(1);
        }
    }
}
