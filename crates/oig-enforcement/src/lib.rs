pub mod classify;
pub mod collector;
mod parser;
pub mod scraper;
pub mod storage;
pub mod types;

use std::time::Duration;

pub use classify::{ClassifiedTable, load_and_classify};
pub use collector::{Collection, Collector, CollectorConfig};
pub use scraper::{ScraperError, WebScraper};

pub(crate) const BASE_URL: &str = "https://oig.hhs.gov/fraud/enforcement/";
pub(crate) const SITE_ORIGIN: &str = "https://oig.hhs.gov";
pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub const MIN_SUPPORTED_YEAR: i32 = 2013;
pub const MAX_PAGES: u32 = 100;
pub const PAGE_DELAY: Duration = Duration::from_secs(1);

pub const DEFAULT_START_MONTH: u32 = 1;
pub const DEFAULT_START_YEAR: i32 = 2022;
