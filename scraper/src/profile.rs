//! Selector priority lists, kept as data so they can be retuned from the
//! config file when the site markup shifts.

use crate::error::ConfigError;
use scraper::Selector;
use serde::Deserialize;
use tracing::warn;

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Ordered CSS selector candidates, highest priority first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SelectorProfile {
    pub containers: Vec<String>,
    pub company: Vec<String>,
    pub title: Vec<String>,
    pub location: Vec<String>,
    pub salary: Vec<String>,
    pub job_type: Vec<String>,
    pub duration: Vec<String>,
    /// Anchors whose `href` is the detail link.
    pub link: Vec<String>,
}

impl Default for SelectorProfile {
    fn default() -> Self {
        Self {
            containers: owned(&[
                "div.container-fluid.individual_internship.visibilityTrackerItem",
                "div.individual_internship",
                "div[id^='individual_internship']",
                "div.internship_meta",
            ]),
            company: owned(&[
                "div.company_and_premium a",
                "div.company_and_premium p",
                "p.company-name",
                ".company_name a",
                ".company_name",
            ]),
            title: owned(&[
                "div.company a",
                "h3.job-internship-name a",
                "a.job-title-href",
                ".profile a",
                "h3",
            ]),
            location: owned(&[
                "a.location_link.view_detail_button",
                "div.locations a",
                "p.locations span a",
                "#location_names a",
                ".location_link",
            ]),
            salary: owned(&["span.stipend", ".stipend", ".salary"]),
            job_type: owned(&[
                "div.other_label_container div div",
                "div.other_label_container .status",
                ".gray-labels .status",
                ".status-inactive",
            ]),
            duration: owned(&[
                "div.row-1-item span",
                "div.other_detail_item .item_body",
                ".item_body",
                ".duration",
            ]),
            link: owned(&[
                "div.cta_container a[href]",
                "a.job-title-href[href]",
                "div.company a[href]",
                "h3 a[href]",
                "a[href]",
            ]),
        }
    }
}

/// [`SelectorProfile`] with every usable selector parsed.
#[derive(Debug)]
pub struct CompiledProfile {
    pub containers: Vec<Selector>,
    pub company: Vec<Selector>,
    pub title: Vec<Selector>,
    pub location: Vec<Selector>,
    pub salary: Vec<Selector>,
    pub job_type: Vec<Selector>,
    pub duration: Vec<Selector>,
    pub link: Vec<Selector>,
}

impl SelectorProfile {
    pub fn compile(&self) -> Result<CompiledProfile, ConfigError> {
        Ok(CompiledProfile {
            containers: compile_list("containers", &self.containers)?,
            company: compile_list("company", &self.company)?,
            title: compile_list("title", &self.title)?,
            location: compile_list("location", &self.location)?,
            salary: compile_list("salary", &self.salary)?,
            job_type: compile_list("job_type", &self.job_type)?,
            duration: compile_list("duration", &self.duration)?,
            link: compile_list("link", &self.link)?,
        })
    }
}

/// Parses each selector, dropping (and logging) the ones that do not parse.
fn compile_list(name: &'static str, raw: &[String]) -> Result<Vec<Selector>, ConfigError> {
    let selectors: Vec<Selector> = raw
        .iter()
        .filter_map(|s| match Selector::parse(s) {
            Ok(selector) => Some(selector),
            Err(e) => {
                warn!("Ignoring invalid {} selector {:?}: {:?}", name, s, e);
                None
            }
        })
        .collect();

    if selectors.is_empty() {
        return Err(ConfigError::EmptySelectorList(name));
    }
    Ok(selectors)
}
