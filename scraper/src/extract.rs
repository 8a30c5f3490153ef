//! Per-listing field extraction.
//!
//! Every field owns an ordered list of selector candidates. Candidates are
//! tried left to right and the first one producing an acceptable value wins;
//! when none does, the field falls back to its sentinel. Fields are resolved
//! independently, so a field that cannot be read never affects the others.

use crate::error::ConfigError;
use crate::profile::CompiledProfile;
use common::{is_sentinel, ListingRecord, NOT_FOUND, NOT_SPECIFIED};
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::OnceLock;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Company,
    Title,
    Location,
    Salary,
    JobType,
    Duration,
    Link,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Company => "company",
            Field::Title => "title",
            Field::Location => "location",
            Field::Salary => "salary",
            Field::JobType => "job_type",
            Field::Duration => "duration",
            Field::Link => "link",
        }
    }

    pub fn default_value(self) -> &'static str {
        match self {
            Field::Salary | Field::JobType | Field::Duration => NOT_SPECIFIED,
            Field::Company | Field::Title | Field::Location | Field::Link => NOT_FOUND,
        }
    }

    fn candidates(self, profile: &CompiledProfile) -> &[Selector] {
        match self {
            Field::Company => &profile.company,
            Field::Title => &profile.title,
            Field::Location => &profile.location,
            Field::Salary => &profile.salary,
            Field::JobType => &profile.job_type,
            Field::Duration => &profile.duration,
            Field::Link => &profile.link,
        }
    }

    /// Cleans a raw candidate value, or rejects it so the next candidate is
    /// tried.
    fn normalize(self, raw: &str) -> Option<String> {
        let value = match self {
            Field::Salary => collapse_whitespace(&currency_re().replace_all(raw, "")),
            Field::Duration => {
                let value = collapse_whitespace(raw);
                if !duration_re().is_match(&value) {
                    return None;
                }
                value
            }
            _ => collapse_whitespace(raw),
        };

        if value.is_empty() || is_sentinel(&value) {
            None
        } else {
            Some(value)
        }
    }
}

fn currency_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[₹$€£,]").expect("currency pattern is valid"))
}

fn duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(day|week|month|year)s?\b").expect("duration pattern is valid")
    })
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

/// Builds [`ListingRecord`]s out of listing containers.
pub struct Extractor {
    profile: CompiledProfile,
    base: Url,
}

impl Extractor {
    pub fn new(profile: CompiledProfile, base_url: &str) -> Result<Self, ConfigError> {
        let base = Url::parse(base_url).map_err(|source| ConfigError::BaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self { profile, base })
    }

    pub fn profile(&self) -> &CompiledProfile {
        &self.profile
    }

    /// Extracts one record. Never fails: unresolved fields hold their sentinel.
    pub fn extract(&self, container: ElementRef) -> ListingRecord {
        let field = |f: Field| {
            self.resolve(container, f)
                .unwrap_or_else(|| f.default_value().to_string())
        };

        ListingRecord {
            company_name: field(Field::Company),
            job_title: field(Field::Title),
            location: field(Field::Location),
            salary: field(Field::Salary),
            job_type: field(Field::JobType),
            duration: field(Field::Duration),
            detail_url: field(Field::Link),
        }
    }

    /// Extracts every container of a page, dropping containers that yield
    /// neither a company nor a title.
    pub fn extract_page(&self, containers: &[ElementRef]) -> Vec<ListingRecord> {
        containers
            .iter()
            .map(|c| self.extract(*c))
            .filter(|record| {
                if record.is_noise() {
                    debug!("Discarding container without company or title");
                    false
                } else {
                    true
                }
            })
            .collect()
    }

    fn resolve(&self, container: ElementRef, field: Field) -> Option<String> {
        let candidates = field.candidates(&self.profile);
        for (rank, selector) in candidates.iter().enumerate() {
            if let Some(value) = self.resolve_candidate(container, field, selector) {
                if rank > 0 {
                    debug!("{} resolved by fallback candidate #{}", field.name(), rank + 1);
                }
                return Some(value);
            }
        }
        debug!("{} not found, using {:?}", field.name(), field.default_value());
        None
    }

    /// First element matched by `selector` whose value the field accepts.
    fn resolve_candidate(
        &self,
        container: ElementRef,
        field: Field,
        selector: &Selector,
    ) -> Option<String> {
        container.select(selector).find_map(|element| match field {
            Field::Link => element
                .value()
                .attr("href")
                .and_then(|href| self.resolve_link(href)),
            _ => field.normalize(&element_text(element)),
        })
    }

    /// Absolute form of a listing link; root-relative paths are joined onto
    /// the site origin, anything else is kept verbatim.
    fn resolve_link(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
            return None;
        }
        if href.starts_with('/') {
            return self.base.join(href).ok().map(String::from);
        }
        Some(href.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::locate;
    use crate::profile::SelectorProfile;
    use scraper::Html;

    fn extractor() -> Extractor {
        let profile = SelectorProfile::default().compile().unwrap();
        Extractor::new(profile, "https://internshala.com").unwrap()
    }

    fn extract_all(html: &str) -> Vec<ListingRecord> {
        let extractor = extractor();
        let document = Html::parse_document(html);
        let containers = locate(&document, &extractor.profile().containers);
        extractor.extract_page(&containers)
    }

    const FULL_LISTING: &str = r#"
        <div class="container-fluid individual_internship visibilityTrackerItem">
          <div class="company">
            <h3 class="heading_4_5 profile"><a href="/internship/detail/42">Data
                Analyst   Intern</a></h3>
            <div class="company_and_premium"><a>  Acme   Analytics  </a></div>
          </div>
          <div id="location_names"><a class="location_link view_detail_button">Bangalore</a></div>
          <div class="internship_other_details_container">
            <div class="other_detail_item"><div class="item_body">Immediately</div></div>
            <div class="other_detail_item"><div class="item_body">3 Months</div></div>
            <div class="other_detail_item"><span class="stipend">₹10,000/month</span></div>
          </div>
          <div class="other_label_container"><div><div>Work From Home</div></div></div>
          <div class="cta_container"><a href="/internship/detail/42-apply">View details</a></div>
        </div>"#;

    #[test]
    fn test_full_listing() {
        let records = extract_all(FULL_LISTING);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.company_name, "Acme Analytics");
        assert_eq!(record.job_title, "Data Analyst Intern");
        assert_eq!(record.location, "Bangalore");
        assert_eq!(record.salary, "10000/month");
        assert_eq!(record.job_type, "Work From Home");
        assert_eq!(record.duration, "3 Months");
        assert_eq!(
            record.detail_url,
            "https://internshala.com/internship/detail/42-apply"
        );
    }

    #[test]
    fn test_missing_salary_defaults() {
        let records = extract_all(
            r#"<div class="individual_internship">
                 <div class="company_and_premium"><p>Globex</p></div>
               </div>"#,
        );
        assert_eq!(records[0].company_name, "Globex");
        assert_eq!(records[0].salary, NOT_SPECIFIED);
        assert_eq!(records[0].job_type, NOT_SPECIFIED);
        assert_eq!(records[0].location, NOT_FOUND);
        assert_eq!(records[0].detail_url, NOT_FOUND);
    }

    #[test]
    fn test_duration_requires_unit_keyword() {
        let records = extract_all(
            r#"<div class="individual_internship">
                 <h3 class="job-internship-name"><a>Designer</a></h3>
                 <div class="item_body">Starts soon</div>
                 <div class="item_body">Flexible</div>
               </div>"#,
        );
        assert_eq!(records[0].job_title, "Designer");
        assert_eq!(records[0].duration, NOT_SPECIFIED);
    }

    #[test]
    fn test_duration_skips_non_duration_spans() {
        let records = extract_all(
            r#"<div class="individual_internship">
                 <h3 class="job-internship-name"><a>Designer</a></h3>
                 <div class="row-1-item"><span>Mumbai</span></div>
                 <div class="row-1-item"><span>6 weeks</span></div>
               </div>"#,
        );
        assert_eq!(records[0].duration, "6 weeks");
    }

    #[test]
    fn test_empty_salary_after_cleanup_defaults() {
        let records = extract_all(
            r#"<div class="individual_internship">
                 <p class="company-name">Initech</p>
                 <span class="stipend"> ₹ , </span>
               </div>"#,
        );
        assert_eq!(records[0].salary, NOT_SPECIFIED);
    }

    #[test]
    fn test_sentinel_text_is_not_accepted() {
        let records = extract_all(
            r#"<div class="individual_internship">
                 <p class="company-name">Initech</p>
                 <span class="stipend">Not specified</span>
                 <span class="salary">₹ 5,000 - 8,000 /month</span>
               </div>"#,
        );
        assert_eq!(records[0].salary, "5000 - 8000 /month");
    }

    #[test]
    fn test_noise_container_is_dropped() {
        let records = extract_all(
            r#"<div class="individual_internship"><span class="stipend">₹1,000</span></div>
               <div class="individual_internship"><p class="company-name">Real Co</p></div>"#,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].company_name, "Real Co");
    }

    #[test]
    fn test_relative_link_is_resolved() {
        let records = extract_all(
            r#"<div class="individual_internship">
                 <p class="company-name">Hooli</p>
                 <a href="/internship/detail/123">Open</a>
               </div>"#,
        );
        assert_eq!(
            records[0].detail_url,
            "https://internshala.com/internship/detail/123"
        );
    }

    #[test]
    fn test_absolute_link_kept_as_is() {
        let records = extract_all(
            r##"<div class="individual_internship">
                 <p class="company-name">Hooli</p>
                 <a href="#">menu</a>
                 <a href="https://example.org/job/9">Open</a>
               </div>"##,
        );
        assert_eq!(records[0].detail_url, "https://example.org/job/9");
    }

    #[test]
    fn test_link_without_cta_ignores_location_anchor() {
        let records = extract_all(
            r#"<div class="individual_internship">
                 <div class="company">
                   <h3 class="heading_4_5 profile"><a href="/internship/detail/77">Designer</a></h3>
                 </div>
                 <a class="location_link view_detail_button"
                    href="/internships/internship-in-bangalore">Bangalore</a>
               </div>"#,
        );
        assert_eq!(records[0].location, "Bangalore");
        assert_eq!(
            records[0].detail_url,
            "https://internshala.com/internship/detail/77"
        );
    }

    #[test]
    fn test_inline_markup_does_not_split_words() {
        let records = extract_all(
            r#"<div class="individual_internship">
                 <h3 class="job-internship-name"><a>Data Analy<b>st</b>  Intern</a></h3>
               </div>"#,
        );
        assert_eq!(records[0].job_title, "Data Analyst Intern");
    }

    #[test]
    fn test_salary_cleanup() {
        assert_eq!(
            Field::Salary.normalize("₹10,000/month").as_deref(),
            Some("10000/month")
        );
        assert_eq!(Field::Salary.normalize(" ₹ "), None);
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(
            Field::Company.normalize("\n  Big \t  Corp \n").as_deref(),
            Some("Big Corp")
        );
    }

    #[test]
    fn test_duration_keyword_matching() {
        assert_eq!(Field::Duration.normalize("2 Months").as_deref(), Some("2 Months"));
        assert_eq!(Field::Duration.normalize("1 year").as_deref(), Some("1 year"));
        assert_eq!(Field::Duration.normalize("3Months").as_deref(), Some("3Months"));
        assert_eq!(Field::Duration.normalize("Immediately"), None);
        assert_eq!(Field::Duration.normalize("Monthly stipend"), None);
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let profile = SelectorProfile::default().compile().unwrap();
        assert!(matches!(
            Extractor::new(profile, "not a url"),
            Err(ConfigError::BaseUrl { .. })
        ));
    }
}
