//! URL normalisation for search result deduplication.
//!
//! Produces a comparison key so that equivalent pages (differing only in
//! `www.`, capitalisation of the host, tracking parameters, fragments,
//! parameter order or a trailing slash) compare as equal.

use url::Url;

/// Tracking query parameters that are stripped during normalisation.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "msclkid",
    "ref",
    "ref_src",
];

/// Normalise a URL into a deduplication key.
///
/// 1. Lowercase scheme and host, drop a leading `www.`.
/// 2. Drop default ports and the fragment.
/// 3. Strip tracking parameters and sort the rest.
/// 4. Drop trailing slashes from the path, including a bare `/`.
///
/// The key is meant for comparison only. Unparseable input is returned
/// trimmed and otherwise unchanged.
///
/// # Examples
///
/// ```
/// use mawrid_search::orchestrator::url_normalize::normalize_url;
///
/// let a = normalize_url("https://WWW.Example.COM/path/?b=2&a=1&utm_source=x#top");
/// let b = normalize_url("https://example.com/path?a=1&b=2");
/// assert_eq!(a, b);
/// ```
pub fn normalize_url(raw: &str) -> String {
    let Ok(parsed) = Url::parse(raw.trim()) else {
        return raw.trim().to_owned();
    };

    let host = parsed.host_str().unwrap_or_default().to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    // `port()` is already `None` for the scheme's default port.
    let port = parsed.port().map(|p| format!(":{p}")).unwrap_or_default();

    let path = parsed.path().trim_end_matches('/');

    let mut params: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.to_lowercase().as_str()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    params.sort();
    let query = if params.is_empty() {
        String::new()
    } else {
        let joined = params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("?{joined}")
    };

    format!("{}://{host}{port}{path}{query}", parsed.scheme())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_host_and_keeps_path_case() {
        assert_eq!(
            normalize_url("HTTPS://Example.COM/Path"),
            "https://example.com/Path"
        );
    }

    #[test]
    fn strips_www_prefix() {
        assert_eq!(
            normalize_url("https://www.example.com/page"),
            normalize_url("https://example.com/page")
        );
    }

    #[test]
    fn removes_trailing_slash_including_root() {
        assert_eq!(normalize_url("https://example.com/path/"), "https://example.com/path");
        assert_eq!(normalize_url("https://example.com/"), "https://example.com");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
    }

    #[test]
    fn removes_default_port_only() {
        assert_eq!(normalize_url("https://example.com:443/a"), "https://example.com/a");
        assert_eq!(normalize_url("http://example.com:80/a"), "http://example.com/a");
        assert_eq!(
            normalize_url("https://example.com:8080/a"),
            "https://example.com:8080/a"
        );
    }

    #[test]
    fn removes_fragment() {
        assert_eq!(
            normalize_url("https://example.com/page#section"),
            "https://example.com/page"
        );
    }

    #[test]
    fn strips_tracking_params_and_sorts_the_rest() {
        assert_eq!(
            normalize_url("https://example.com/s?z=1&utm_source=google&a=2&fbclid=abc"),
            "https://example.com/s?a=2&z=1"
        );
    }

    #[test]
    fn tracking_param_match_ignores_case() {
        assert_eq!(
            normalize_url("https://example.com/page?q=test&UTM_Source=twitter"),
            "https://example.com/page?q=test"
        );
    }

    #[test]
    fn invalid_url_returned_trimmed() {
        assert_eq!(normalize_url("  not a url at all "), "not a url at all");
        assert_eq!(normalize_url(""), "");
    }
}
