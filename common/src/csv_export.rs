//! CSV export of scraped listings.

use crate::{ListingRecord, NOT_FOUND};
use chrono::Local;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fixed column order of every export.
pub const HEADERS: [&str; 7] = [
    "Company_Name",
    "Company_Location",
    "Job_Title",
    "Job_Salary",
    "Job_Type",
    "Job_Duration",
    "Job_Detail_URL",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to prepare {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

fn or_missing(value: &str) -> &str {
    if value.trim().is_empty() { NOT_FOUND } else { value }
}

/// Writes the header row followed by one row per record.
pub fn write_csv<W: Write>(writer: W, records: &[ListingRecord]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADERS)?;

    for record in records {
        wtr.write_record([
            or_missing(&record.company_name),
            or_missing(&record.location),
            or_missing(&record.job_title),
            or_missing(&record.salary),
            or_missing(&record.job_type),
            or_missing(&record.duration),
            or_missing(&record.detail_url),
        ])?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Renders the export into a string, for HTTP downloads.
pub fn to_csv_string(records: &[ListingRecord]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes `internshala_jobs_<timestamp>.csv` into `dir`, creating it if needed.
pub fn export_file(dir: &Path, records: &[ListingRecord]) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(format!("internshala_jobs_{}.csv", timestamp()));
    write_to(&path, records)?;
    Ok(path)
}

/// Writes the export to an explicit path.
pub fn write_to(path: &Path, records: &[ListingRecord]) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(file, records)
}

/// Suggested file name for a browser download of one search.
pub fn download_name(position: &str, location: &str) -> String {
    format!(
        "jobs_{}_{}_{}.csv",
        position.trim().replace(' ', "_"),
        location.trim().replace(' ', "_"),
        timestamp()
    )
}

fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NOT_SPECIFIED;

    #[test]
    fn test_header_present_without_records() {
        let out = to_csv_string(&[]).unwrap();
        assert_eq!(
            out,
            "Company_Name,Company_Location,Job_Title,Job_Salary,Job_Type,Job_Duration,Job_Detail_URL\n"
        );
    }

    #[test]
    fn test_row_follows_column_order() {
        let record = ListingRecord {
            company_name: "Acme Labs".to_string(),
            job_title: "Data Analyst".to_string(),
            location: "Bangalore".to_string(),
            salary: "10000/month".to_string(),
            job_type: "Work from office".to_string(),
            duration: "3 Months".to_string(),
            detail_url: "https://internshala.com/internship/detail/1".to_string(),
        };
        let out = to_csv_string(&[record]).unwrap();
        let row = out.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "Acme Labs,Bangalore,Data Analyst,10000/month,Work from office,3 Months,https://internshala.com/internship/detail/1"
        );
    }

    #[test]
    fn test_blank_values_render_as_missing() {
        let record = ListingRecord {
            company_name: String::new(),
            job_title: "Intern".to_string(),
            ..ListingRecord::default()
        };
        let out = to_csv_string(&[record]).unwrap();
        let row = out.lines().nth(1).unwrap();
        assert!(row.starts_with("N/A,N/A,Intern,"));
        assert!(row.contains(NOT_SPECIFIED));
    }

    #[test]
    fn test_values_with_commas_are_quoted() {
        let record = ListingRecord {
            company_name: "Foo, Inc".to_string(),
            job_title: "Intern".to_string(),
            ..ListingRecord::default()
        };
        let out = to_csv_string(&[record]).unwrap();
        assert!(out.lines().nth(1).unwrap().starts_with("\"Foo, Inc\","));
    }

    #[test]
    fn test_download_name_replaces_spaces() {
        let name = download_name("Python Developer", "New Delhi");
        assert!(name.starts_with("jobs_Python_Developer_New_Delhi_"));
        assert!(name.ends_with(".csv"));
    }
}
