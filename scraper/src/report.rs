use crate::error::{FetchError, ScrapeError};
use common::ResultSet;

/// One-line outcome for the user: a result count, or why there is nothing.
pub fn describe(outcome: &Result<ResultSet, ScrapeError>) -> String {
    match outcome {
        Ok(results) => summarize(results),
        Err(e) => failure(e),
    }
}

pub fn summarize(results: &ResultSet) -> String {
    if results.is_empty() {
        return "No listings found. Make sure the position and location keywords are correct, \
                try broader search terms, or the site layout may have changed."
            .to_string();
    }

    let mut msg = format!("{} results found", results.len());
    if results.pages_failed > 0 {
        msg.push_str(&format!(
            " ({} of {} pages could not be fetched)",
            results.pages_failed, results.pages_requested
        ));
    }
    msg
}

pub fn failure(error: &ScrapeError) -> String {
    let ScrapeError::AllPagesFailed { last, .. } = error;
    let cause = match last {
        FetchError::RetriesExhausted { last, .. } => last.as_ref(),
        other => other,
    };
    match cause {
        FetchError::Status { status: 403 | 429, .. } => {
            format!("The site refused our requests ({last}). Try again later.")
        }
        _ => format!("Could not reach the site: {last}. Check your network connection."),
    }
}
