//! URL query-parameter injection.
//!
//! Works on the raw URL string rather than a parsed `Url` so that relative
//! route prefixes (`/data/plugin/projector`) are handled the same way as
//! absolute ones.

use regex::Regex;

/// Insert or replace a query parameter in `url`, preserving any `#fragment`.
///
/// Repeated calls with the same key are idempotent: the parameter occurs
/// exactly once afterwards. The value is used verbatim; callers encode it if
/// needed.
pub fn add_parameter(url: &str, key: &str, value: &str) -> String {
    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };

    let existing = Regex::new(&format!(r"(\?|&){}=[^&]*", regex::escape(key)))
        .expect("escaped parameter regex is valid");

    let mut out = if existing.is_match(base) {
        // Replace in place, keeping the ? or & that preceded the key. A
        // closure replacer keeps `$` in values literal.
        existing
            .replace(base, |caps: &regex::Captures| {
                format!("{}{key}={value}", &caps[1])
            })
            .into_owned()
    } else if base.contains('?') {
        format!("{base}&{key}={value}")
    } else {
        format!("{base}?{key}={value}")
    };

    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}
