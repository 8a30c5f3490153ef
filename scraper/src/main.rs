//! Internshala Internship Scraper
//!
//! Searches internships by position and location, prints every listing
//! and optionally saves them to CSV or JSON.

use anyhow::{Context, Result};
use clap::Parser;
use common::csv_export;
use common::{ListingRecord, SearchQuery};
use internship_scraper::{report, Scraper, ScraperConfig};
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "internshala")]
#[command(about = "Search jobs & internships via Internshala")]
struct Cli {
    /// Job position, e.g. "Python Developer" (asked for when omitted)
    #[arg(long)]
    position: Option<String>,

    /// City, e.g. "Bangalore" (asked for when omitted)
    #[arg(long)]
    location: Option<String>,

    /// Number of result pages to scrape
    #[arg(long)]
    pages: Option<u32>,

    /// TOML file overriding the default scraper settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save results as CSV; without a path a timestamped file is written to job_data/
    #[arg(long, num_args = 0..=1)]
    csv: Option<Option<PathBuf>>,

    /// Save results as pretty-printed JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ScraperConfig::load(cli.config.as_deref())?;

    println!("Search Job & Internship Via Internshala");
    println!("{}", "=".repeat(40));

    let position = match cli.position {
        Some(p) => p,
        None => prompt_non_empty("Job Position: ", "Position")?,
    };
    let location = match cli.location {
        Some(l) => l,
        None => prompt_non_empty("Location: ", "Location")?,
    };
    let query = SearchQuery::new(&position, &location, cli.pages.unwrap_or(config.max_pages))?;

    println!(
        "\n🔍 Searching for {} positions in {}...",
        query.position(),
        query.location()
    );
    println!("{}", "=".repeat(50));

    let scraper = Scraper::from_config(&config)?;
    let outcome = scraper.scrape(&query, &mut |msg: &str| println!("📡 {msg}"));
    let message = report::describe(&outcome);

    let results = match outcome {
        Ok(results) => results,
        Err(e) => {
            eprintln!("❌ {message}");
            return Err(e.into());
        }
    };

    if results.is_empty() {
        println!("⚠️  {message}");
        return Ok(());
    }

    println!();
    for record in &results.records {
        print_record(record);
    }

    let summary = results.summary();
    println!("📊 {message}");
    println!(
        "   Unique companies: {} | With salary info: {} | Unique locations: {}",
        summary.unique_companies, summary.with_salary, summary.unique_locations
    );

    if let Some(path) = &cli.json {
        save_json(path, &results.records)?;
    }

    match cli.csv {
        Some(Some(path)) => {
            csv_export::write_to(&path, &results.records)?;
            println!("💾 File saved successfully: {}", path.display());
        }
        Some(None) => save_csv(&results.records)?,
        None if io::stdin().is_terminal() => {
            if ask_yes_no("Want to save data to CSV file? [Y/n]: ")? {
                save_csv(&results.records)?;
            }
            println!("Thank You!");
        }
        None => {}
    }

    Ok(())
}

fn print_record(record: &ListingRecord) {
    println!("Company Name: {}", record.company_name);
    println!("Company Location: {}", record.location);
    println!("Job Title: {}", record.job_title);
    println!("Job Salary: {}", record.salary);
    println!("Job Type: {}", record.job_type);
    println!("Job Duration: {}", record.duration);
    println!("Job Detail: {}", record.detail_url);
    println!();
}

fn save_csv(records: &[ListingRecord]) -> Result<()> {
    let path = csv_export::export_file(Path::new("job_data"), records)?;
    println!("💾 File saved successfully: {}", path.display());
    Ok(())
}

fn save_json(path: &Path, records: &[ListingRecord]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(records).context("serializing records")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    println!("💾 Saved {} jobs to {}", records.len(), path.display());
    Ok(())
}

/// Reads one trimmed line; `None` on end of input.
fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt_non_empty(prompt: &str, what: &str) -> Result<String> {
    loop {
        match read_line(prompt)? {
            Some(value) if !value.is_empty() => return Ok(value),
            Some(_) => println!("{what} cannot be empty. Please try again."),
            None => anyhow::bail!("{what} is required"),
        }
    }
}

fn ask_yes_no(prompt: &str) -> Result<bool> {
    loop {
        match read_line(prompt)?.as_deref() {
            Some("Y") => return Ok(true),
            Some("n") | None => return Ok(false),
            Some(_) => println!("Input invalid"),
        }
    }
}
