// src/checker/domain.rs
// =============================================================================
// This module derives the host and "true domain" of a checked URL.
//
// Two values come out of normalization:
// - main_domain: the network-location of the URL (host, plus :port when an
//   explicit non-default port is present)
// - true_domain: the main_domain with its leftmost label stripped when the
//   name has 3+ dot-separated labels (www.example.com -> example.com)
//
// The true-domain rule is a one-level subdomain-strip heuristic, not
// public-suffix resolution: multi-part suffixes like co.uk come out wrong
// (news.bbc.co.uk -> bbc.co.uk, but bbc.co.uk -> co.uk). Downstream
// grouping depends on this exact behavior, so it stays as documented.
// =============================================================================

use url::Url;

/// Derives `(main_domain, true_domain)` from a URL string.
///
/// A URL that cannot be parsed, or that has no host (like a mailto: or
/// data: URL), yields two empty strings. That is not an error condition
/// for the caller.
///
/// Example:
///   normalize("http://www.example.com/x") == ("www.example.com", "example.com")
///   normalize("http://example.com/x")     == ("example.com", "example.com")
pub fn normalize(url: &str) -> (String, String) {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return (String::new(), String::new()),
    };

    let host = match parsed.host_str() {
        Some(host) => host,
        None => return (String::new(), String::new()),
    };

    // Url::port() is None when the port is the scheme default, so the
    // default port never shows up in the domain
    let main_domain = match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    let true_domain = strip_leftmost_label(&main_domain);

    (main_domain, true_domain)
}

// Strips the leftmost dot-separated label when there are at least three
// labels; shorter names are returned unchanged
fn strip_leftmost_label(main_domain: &str) -> String {
    let labels: Vec<&str> = main_domain.split('.').collect();

    if labels.len() >= 3 {
        labels[1..].join(".")
    } else {
        main_domain.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdomain_is_stripped() {
        let (main_domain, true_domain) = normalize("http://www.example.com/x");
        assert_eq!(main_domain, "www.example.com");
        assert_eq!(true_domain, "example.com");
    }

    #[test]
    fn test_two_label_host_is_unchanged() {
        let (main_domain, true_domain) = normalize("http://example.com/x");
        assert_eq!(main_domain, "example.com");
        assert_eq!(true_domain, "example.com");
    }

    #[test]
    fn test_deep_subdomain_strips_one_level_only() {
        let (main_domain, true_domain) = normalize("https://a.b.example.com/");
        assert_eq!(main_domain, "a.b.example.com");
        assert_eq!(true_domain, "b.example.com");
    }

    #[test]
    fn test_explicit_port_is_kept() {
        let (main_domain, true_domain) = normalize("http://www.example.com:8080/x");
        assert_eq!(main_domain, "www.example.com:8080");
        assert_eq!(true_domain, "example.com:8080");
    }

    #[test]
    fn test_default_port_is_dropped() {
        let (main_domain, _) = normalize("https://example.com:443/x");
        assert_eq!(main_domain, "example.com");
    }

    #[test]
    fn test_malformed_url_yields_empty_strings() {
        assert_eq!(normalize("not a url"), (String::new(), String::new()));
    }

    #[test]
    fn test_url_without_host_yields_empty_strings() {
        assert_eq!(
            normalize("mailto:test@example.com"),
            (String::new(), String::new())
        );
    }

    #[test]
    fn test_known_public_suffix_limitation() {
        // Documented heuristic behavior: co.uk is treated like any other
        // parent domain
        let (_, true_domain) = normalize("http://news.bbc.co.uk/");
        assert_eq!(true_domain, "bbc.co.uk");
        let (_, true_domain) = normalize("http://bbc.co.uk/");
        assert_eq!(true_domain, "co.uk");
    }
}
