//! URL and string helpers for assembling sitemap entries.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Joins relative paths onto a base URL.
///
/// Trailing slashes on the base and a missing leading slash on a path are
/// both tolerated; the result always has exactly one slash at the join.
#[must_use]
pub fn combine_urls(base_url: &str, paths: &[impl AsRef<str>]) -> Vec<String> {
    let trimmed_base = base_url.trim_end_matches('/');
    paths
        .iter()
        .map(|p| {
            let path = p.as_ref();
            if path.starts_with('/') {
                format!("{trimmed_base}{path}")
            } else {
                format!("{trimmed_base}/{path}")
            }
        })
        .collect()
}

/// Turns arbitrary text into a lowercase ASCII kebab slug.
///
/// Accented characters are decomposed and their combining marks dropped, so
/// `"Crème Brûlée"` becomes `"creme-brulee"`. Runs of anything outside
/// `[a-z0-9]` collapse into a single hyphen; leading and trailing hyphens
/// are stripped.
#[must_use]
pub fn slugify(text: &str) -> String {
    let folded: String = text
        .trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    let mut slug = String::with_capacity(folded.len());
    let mut pending_hyphen = false;
    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}
