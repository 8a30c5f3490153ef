//! Drives fetch, locate and extract across the requested page range.

use crate::config::ScraperConfig;
use crate::error::{ConfigError, FetchError, ScrapeError};
use crate::extract::Extractor;
use crate::fetch::{Fetcher, PageSource};
use crate::locate::locate;
use crate::search_url::search_url;
use common::{ResultSet, SearchQuery};
use scraper::Html;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Receives human-readable status lines while a scrape runs.
pub trait Progress {
    fn message(&mut self, msg: &str);
}

impl<F: FnMut(&str)> Progress for F {
    fn message(&mut self, msg: &str) {
        self(msg)
    }
}

/// A no-op progress sink.
pub struct NullProgress;

impl Progress for NullProgress {
    fn message(&mut self, _msg: &str) {}
}

/// One search session. Owns its page source; nothing is shared between
/// scrapers.
pub struct Scraper<S: PageSource> {
    source: S,
    extractor: Extractor,
    base_url: String,
    cooldown: Duration,
}

impl Scraper<Fetcher> {
    /// Scraper backed by a live HTTP session.
    pub fn from_config(config: &ScraperConfig) -> Result<Self, ConfigError> {
        Self::with_source(Fetcher::new(config)?, config)
    }
}

impl<S: PageSource> Scraper<S> {
    pub fn with_source(source: S, config: &ScraperConfig) -> Result<Self, ConfigError> {
        let profile = config.selectors.compile()?;
        Ok(Self {
            source,
            extractor: Extractor::new(profile, &config.base_url)?,
            base_url: config.base_url.clone(),
            cooldown: config.cooldown(),
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Scrapes pages `1..=query.max_pages()`.
    ///
    /// Pages that cannot be fetched are skipped. The first page whose locator
    /// finds no listing ends the scrape. Fails only when no page at all could
    /// be fetched.
    pub fn scrape(
        &self,
        query: &SearchQuery,
        progress: &mut dyn Progress,
    ) -> Result<ResultSet, ScrapeError> {
        let max_pages = query.max_pages();
        let mut results = ResultSet::default();
        let mut last_error: Option<FetchError> = None;

        for page in 1..=max_pages {
            let url = search_url(&self.base_url, query.position(), query.location(), page);
            progress.message(&format!("Fetching page {page} of {max_pages}..."));
            results.pages_requested += 1;

            let html = match self.source.fetch(&url) {
                Ok(html) => html,
                Err(e) => {
                    warn!("Skipping page {}: {}", page, e);
                    results.pages_failed += 1;
                    last_error = Some(e);
                    continue;
                }
            };
            results.pages_fetched += 1;

            let records = {
                let document = Html::parse_document(&html);
                let containers = locate(&document, &self.extractor.profile().containers);
                if containers.is_empty() {
                    info!("No listings on page {}, stopping", page);
                    results.stopped_at = Some(page);
                    break;
                }
                self.extractor.extract_page(&containers)
            };

            info!("Page {}: {} listings", page, records.len());
            results.extend_page(records);

            if page < max_pages && !self.cooldown.is_zero() {
                thread::sleep(self.cooldown);
            }
        }

        if results.pages_fetched == 0 {
            if let Some(last) = last_error {
                return Err(ScrapeError::AllPagesFailed {
                    attempted: results.pages_requested,
                    last,
                });
            }
        }

        info!(
            "Scrape finished: {} records from {} pages",
            results.len(),
            results.pages_fetched
        );
        Ok(results)
    }
}
