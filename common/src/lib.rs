//! Shared data model for the internship scraper and its front ends.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub mod csv_export;

/// Placeholder for identity fields (company, title, location, link).
pub const NOT_FOUND: &str = "N/A";

/// Placeholder for salary, job type and duration.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Returns true for either placeholder value.
pub fn is_sentinel(value: &str) -> bool {
    value == NOT_FOUND || value == NOT_SPECIFIED
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("position cannot be empty")]
    EmptyPosition,
    #[error("location cannot be empty")]
    EmptyLocation,
    #[error("at least one page must be requested")]
    ZeroPages,
}

/// One search invocation. Only constructible through [`SearchQuery::new`],
/// so every value is trimmed, non-blank and asks for at least one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    position: String,
    location: String,
    max_pages: u32,
}

impl SearchQuery {
    pub fn new(position: &str, location: &str, max_pages: u32) -> Result<Self, QueryError> {
        let position = position.trim();
        let location = location.trim();

        if position.is_empty() {
            return Err(QueryError::EmptyPosition);
        }
        if location.is_empty() {
            return Err(QueryError::EmptyLocation);
        }
        if max_pages == 0 {
            return Err(QueryError::ZeroPages);
        }

        Ok(Self {
            position: position.to_string(),
            location: location.to_string(),
            max_pages,
        })
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }
}

/// A single listing as scraped from one container. Every field always holds
/// either a real value or one of the sentinels.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ListingRecord {
    pub company_name: String,
    pub job_title: String,
    pub location: String,
    pub salary: String,
    pub job_type: String,
    pub duration: String,
    pub detail_url: String,
}

impl Default for ListingRecord {
    fn default() -> Self {
        Self {
            company_name: NOT_FOUND.to_string(),
            job_title: NOT_FOUND.to_string(),
            location: NOT_FOUND.to_string(),
            salary: NOT_SPECIFIED.to_string(),
            job_type: NOT_SPECIFIED.to_string(),
            duration: NOT_SPECIFIED.to_string(),
            detail_url: NOT_FOUND.to_string(),
        }
    }
}

impl ListingRecord {
    /// Containers that produced neither a company nor a title are not listings.
    pub fn is_noise(&self) -> bool {
        self.company_name == NOT_FOUND && self.job_title == NOT_FOUND
    }

    pub fn has_salary(&self) -> bool {
        !is_sentinel(&self.salary)
    }
}

/// Aggregated output of a scrape, in page order then document order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultSet {
    pub records: Vec<ListingRecord>,
    pub pages_requested: u32,
    pub pages_fetched: u32,
    pub pages_failed: u32,
    /// Page whose locator found no listings, ending the scrape early.
    pub stopped_at: Option<u32>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn extend_page(&mut self, page: Vec<ListingRecord>) {
        self.records.extend(page);
    }

    pub fn summary(&self) -> ResultSummary {
        ResultSummary::of(&self.records)
    }
}

/// Headline numbers shown above a result table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub total: usize,
    pub unique_companies: usize,
    pub with_salary: usize,
    pub unique_locations: usize,
}

impl ResultSummary {
    pub fn of(records: &[ListingRecord]) -> Self {
        let companies: HashSet<&str> = records.iter().map(|r| r.company_name.as_str()).collect();
        let locations: HashSet<&str> = records.iter().map(|r| r.location.as_str()).collect();

        Self {
            total: records.len(),
            unique_companies: companies.len(),
            with_salary: records.iter().filter(|r| r.has_salary()).count(),
            unique_locations: locations.len(),
        }
    }
}
