//! URL helpers for catalog links

use url::Url;

/// Path and fixed parameters of the catalog search endpoint
pub const SEARCH_PATH: &str = "/Search?oq=&ac_posn=&search_submit=&v1=";

/// Build the search URL for a title.
///
/// Words are percent-encoded one by one and joined with the site's `+`
/// separator. The year is never part of the query: titles that share a
/// word with a genre name stop matching when it is appended.
pub fn search_url(base_url: &str, title: &str) -> String {
    let terms: Vec<String> = title
        .split_whitespace()
        .map(|word| urlencoding::encode(word).into_owned())
        .collect();
    format!("{}{}{}", base_url.trim_end_matches('/'), SEARCH_PATH, terms.join("+"))
}

/// Resolve an href or image source found on a catalog page.
///
/// Relative references follow RFC 3986 against `base_url`; an href that
/// cannot be resolved is returned trimmed.
pub fn absolutize(base_url: &str, href: &str) -> String {
    let href = href.trim();
    Url::parse(base_url)
        .and_then(|base| base.join(href))
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}
