//! Search URL construction.

/// Turns a free-text term into a path segment: trimmed, lowercased, each
/// space replaced by `-`, everything else percent-encoded.
pub fn slug(text: &str) -> String {
    let hyphenated = text.trim().to_lowercase().replace(' ', "-");
    urlencoding::encode(&hyphenated).into_owned()
}

/// `<base>/internships/<position>-internship-in-<location>[/page-<n>]`
pub fn search_url(base: &str, position: &str, location: &str, page: u32) -> String {
    let mut url = format!(
        "{}/internships/{}-internship-in-{}",
        base.trim_end_matches('/'),
        slug(position),
        slug(location)
    );
    if page > 1 {
        url.push_str(&format!("/page-{page}"));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_lowercases_and_hyphenates() {
        assert_eq!(slug("Data Analyst"), "data-analyst");
    }

    #[test]
    fn test_slug_empty_and_blank() {
        assert_eq!(slug(""), "");
        assert_eq!(slug("   "), "");
    }

    #[test]
    fn test_slug_maps_each_space_to_a_hyphen() {
        assert_eq!(slug("  python  developer "), "python--developer");
    }

    #[test]
    fn test_slug_encodes_other_whitespace() {
        assert_eq!(slug("a\tb"), "a%09b");
    }

    #[test]
    fn test_slug_encodes_special_characters_but_not_hyphens() {
        assert_eq!(slug("C++ & Go"), "c%2B%2B-%26-go");
        assert_eq!(slug("front-end"), "front-end");
        assert_eq!(slug("ui/ux"), "ui%2Fux");
    }

    #[test]
    fn test_first_page_has_no_suffix() {
        assert_eq!(
            search_url("https://internshala.com/", "Python Developer", "Bangalore", 1),
            "https://internshala.com/internships/python-developer-internship-in-bangalore"
        );
    }

    #[test]
    fn test_later_pages_have_suffix() {
        assert_eq!(
            search_url("https://internshala.com", "web developer", "New Delhi", 3),
            "https://internshala.com/internships/web-developer-internship-in-new-delhi/page-3"
        );
    }
}
