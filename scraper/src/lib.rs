//! Internshala internship scraper.
//!
//! Builds search URLs, fetches result pages with retry, locates listing
//! containers and extracts one [`common::ListingRecord`] per container.

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod locate;
pub mod paginate;
pub mod profile;
pub mod report;
pub mod search_url;

pub use config::ScraperConfig;
pub use error::{ConfigError, FetchError, ScrapeError};
pub use fetch::{Fetcher, PageSource, RetryPolicy};
pub use paginate::{NullProgress, Progress, Scraper};
