use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate};

use crate::parser::{parse_display_date, parse_listing_page};
use crate::scraper::{ListingSource, ScraperError, WebScraper};
use crate::storage::{StorageError, output_file_name, write_actions};
use crate::types::EnforcementAction;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Year must be >= {min}, got {year}")]
    YearTooEarly { year: i32, min: i32 },
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),
}

#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("Failed to save collected actions: {0}")]
    Storage(#[from] StorageError),
}

pub fn target_date(month: u32, year: i32) -> Result<NaiveDate, ValidationError> {
    if year < crate::MIN_SUPPORTED_YEAR {
        return Err(ValidationError::YearTooEarly {
            year,
            min: crate::MIN_SUPPORTED_YEAR,
        });
    }
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(ValidationError::InvalidMonth(month))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Continue,
    Halt,
}

/// Scans one page's actions, newest first.
///
/// Scanning stops at the first action dated before `target`. The run only
/// halts if that happens before any action on this page was kept; a page that
/// kept at least one action always lets the loop move on. Undated or
/// unparseable actions count as `today`.
pub(crate) fn scan_page(
    actions: Vec<EnforcementAction>,
    target: NaiveDate,
    today: NaiveDate,
) -> (Vec<EnforcementAction>, PageOutcome) {
    let mut kept = Vec::new();

    for mut action in actions {
        let date_value = action
            .date_text
            .as_deref()
            .and_then(parse_display_date)
            .unwrap_or(today);

        if date_value < target {
            let outcome = if kept.is_empty() {
                PageOutcome::Halt
            } else {
                PageOutcome::Continue
            };
            return (kept, outcome);
        }

        action.date_value = Some(date_value);
        kept.push(action);
    }

    (kept, PageOutcome::Continue)
}

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub output_dir: PathBuf,
    pub max_pages: u32,
    pub page_delay: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            max_pages: crate::MAX_PAGES,
            page_delay: crate::PAGE_DELAY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Collection {
    pub actions: Vec<EnforcementAction>,
    pub path: PathBuf,
    pub target_date: NaiveDate,
    pub pages_fetched: u32,
    pub pauses: u32,
}

impl Collection {
    pub fn earliest_date_text(&self) -> Option<&str> {
        self.actions.last().and_then(|a| a.date_text.as_deref())
    }

    pub fn latest_date_text(&self) -> Option<&str> {
        self.actions.first().and_then(|a| a.date_text.as_deref())
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rule = "=".repeat(70);
        writeln!(f, "{}", rule)?;
        writeln!(f, "SUCCESS!")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Total actions collected: {}", self.actions.len())?;
        writeln!(f, "Saved to: {}", self.path.display())?;
        writeln!(f, "\nDate range:")?;
        writeln!(
            f,
            "  Earliest: {}",
            self.earliest_date_text().unwrap_or("unknown")
        )?;
        writeln!(f, "  Latest: {}", self.latest_date_text().unwrap_or("unknown"))?;
        write!(f, "{}", rule)
    }
}

pub struct Collector<S> {
    source: S,
    config: CollectorConfig,
}

impl Collector<WebScraper> {
    pub fn web(config: CollectorConfig) -> Result<Self, ScraperError> {
        Ok(Self::new(WebScraper::new()?, config))
    }
}

impl<S: ListingSource> Collector<S> {
    pub fn new(source: S, config: CollectorConfig) -> Self {
        Self { source, config }
    }

    // A failed fetch ends the walk but keeps what was collected; only a
    // failed write is an error.
    pub async fn collect(
        &self,
        month: u32,
        year: i32,
    ) -> Result<Option<Collection>, CollectError> {
        let target = match target_date(month, year) {
            Ok(target) => target,
            Err(e) => {
                log::error!("Invalid start period: {e}");
                return Ok(None);
            }
        };

        log::info!("Starting to scrape from {}/{} to today...", month, year);

        let max_pages = self.config.max_pages;
        let mut actions = Vec::new();
        let mut page = 0;
        let mut pages_fetched = 0;
        let mut pauses = 0;
        let mut outcome = PageOutcome::Continue;

        while outcome == PageOutcome::Continue && page < max_pages {
            log::info!("Scraping page {}...", page + 1);

            let html = match self.source.fetch_page(page).await {
                Ok(html) => html,
                Err(e) => {
                    log::error!("Failed to fetch page {}: {}", page + 1, e);
                    break;
                }
            };
            pages_fetched += 1;

            let listing = parse_listing_page(&html);
            if listing.blocks == 0 {
                log::info!("No items found on page {}", page + 1);
                break;
            }
            log::info!("Found {} items", listing.blocks);

            let today = Local::now().date_naive();
            let (kept, page_outcome) = scan_page(listing.actions, target, today);
            log::debug!("Kept {} actions from page {}", kept.len(), page + 1);
            if page_outcome == PageOutcome::Halt {
                log::info!("Reached target date. Stopping.");
            }
            actions.extend(kept);
            outcome = page_outcome;

            page += 1;
            if outcome == PageOutcome::Continue && page < max_pages {
                tokio::time::sleep(self.config.page_delay).await;
                pauses += 1;
            }
        }

        if actions.is_empty() {
            log::warn!("No data collected.");
            return Ok(None);
        }

        let path = self.config.output_dir.join(output_file_name(year, month));
        write_actions(&path, &actions)?;
        log::info!("Saved {} actions to {}", actions.len(), path.display());

        Ok(Some(Collection {
            actions,
            path,
            target_date: target,
            pages_fetched,
            pauses,
        }))
    }
}
