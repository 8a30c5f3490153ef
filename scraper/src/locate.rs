use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Returns the listing containers matched by the first strategy that finds
/// any. An empty vector means the page holds no listings.
pub fn locate<'a>(document: &'a Html, strategies: &[Selector]) -> Vec<ElementRef<'a>> {
    for (rank, selector) in strategies.iter().enumerate() {
        let found: Vec<ElementRef<'a>> = document.select(selector).collect();
        if !found.is_empty() {
            debug!(
                "Container strategy #{} matched {} listings",
                rank + 1,
                found.len()
            );
            return found;
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SelectorProfile;

    fn strategies() -> Vec<Selector> {
        SelectorProfile::default().compile().unwrap().containers
    }

    #[test]
    fn test_primary_strategy() {
        let html = Html::parse_document(
            r#"<div class="container-fluid individual_internship visibilityTrackerItem">a</div>
               <div class="container-fluid individual_internship visibilityTrackerItem">b</div>
               <div class="individual_internship">not counted</div>"#,
        );
        assert_eq!(locate(&html, &strategies()).len(), 2);
    }

    #[test]
    fn test_falls_back_to_later_strategy() {
        let html = Html::parse_document(
            r#"<div id="individual_internship_1">a</div>
               <div id="individual_internship_2">b</div>
               <div id="individual_internship_3">c</div>"#,
        );
        assert_eq!(locate(&html, &strategies()).len(), 3);
    }

    #[test]
    fn test_first_matching_strategy_wins_in_document_order() {
        let html = Html::parse_document(
            r#"<div class="internship_meta">meta</div>
               <div class="individual_internship" id="x1">one</div>
               <div class="individual_internship" id="x2">two</div>"#,
        );
        let found = locate(&html, &strategies());
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].value().attr("id"), Some("x1"));
    }

    #[test]
    fn test_no_match_is_empty() {
        let html = Html::parse_document("<p>No internships found</p>");
        assert!(locate(&html, &strategies()).is_empty());
    }
}
