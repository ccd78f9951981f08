//! XML codec for sitemap documents.
//!
//! Pure string renderers for urlset and sitemapindex documents. Output is a
//! single line with no indentation; the sitemap protocol only requires
//! well-formedness, and several consumers choke on leading whitespace.

use crate::types::{SitemapEntry, SitemapUrl};
use std::fmt::Write;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Escapes XML entity characters (`& < > " '`) in text content.
///
/// Applied to every value before insertion. Upstream data sources are
/// untrusted; unescaped content must never corrupt the document.
#[must_use]
pub fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn url_to_xml(out: &mut String, url: &SitemapUrl) {
    out.push_str("<url>");
    let _ = write!(out, "<loc>{}</loc>", escape_xml(&url.loc));
    if let Some(lastmod) = &url.lastmod {
        let _ = write!(out, "<lastmod>{}</lastmod>", escape_xml(lastmod));
    }
    if let Some(changefreq) = url.changefreq {
        let _ = write!(out, "<changefreq>{}</changefreq>", changefreq.as_str());
    }
    if let Some(priority) = url.priority {
        let _ = write!(out, "<priority>{priority:.1}</priority>");
    }
    out.push_str("</url>");
}

/// Renders a urlset document from the given entries.
///
/// Bare string entries are treated as `loc`-only URLs. Optional fields are
/// emitted in the fixed order `loc`, `lastmod`, `changefreq`, `priority`,
/// omitting absent ones. An empty slice produces a well-formed empty
/// `<urlset>`.
#[must_use]
pub fn build_url_set_xml(entries: &[SitemapEntry]) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><urlset xmlns=\"{SITEMAP_NS}\">"
    );
    for entry in entries {
        match entry {
            SitemapEntry::Loc(loc) => url_to_xml(&mut out, &SitemapUrl::new(loc.clone())),
            SitemapEntry::Url(url) => url_to_xml(&mut out, url),
        }
    }
    out.push_str("</urlset>");
    out
}

/// Renders a sitemapindex document referencing the given sitemap URLs.
#[must_use]
pub fn build_sitemap_index_xml(sitemap_urls: &[String]) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><sitemapindex xmlns=\"{SITEMAP_NS}\">"
    );
    for url in sitemap_urls {
        let _ = write!(out, "<sitemap><loc>{}</loc></sitemap>", escape_xml(url));
    }
    out.push_str("</sitemapindex>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChangeFreq;

    #[test]
    fn test_empty_urlset_is_exact() {
        assert_eq!(
            build_url_set_xml(&[]),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"></urlset>"
        );
    }

    #[test]
    fn test_bare_entry_renders_loc_only() {
        let xml = build_url_set_xml(&["https://example.com/page".into()]);
        assert!(xml.contains("<url><loc>https://example.com/page</loc></url>"));
        assert!(!xml.contains("<lastmod>"));
        assert!(!xml.contains("<priority>"));
    }

    #[test]
    fn test_full_entry_field_order_and_priority_format() {
        let url = crate::types::SitemapUrl {
            loc: "https://example.com/page".to_string(),
            lastmod: Some("2024-05-01".to_string()),
            changefreq: Some(ChangeFreq::Weekly),
            priority: Some(0.8),
        };
        let xml = build_url_set_xml(&[url.into()]);
        assert!(xml.contains(
            "<url><loc>https://example.com/page</loc>\
             <lastmod>2024-05-01</lastmod>\
             <changefreq>weekly</changefreq>\
             <priority>0.8</priority></url>"
        ));
    }

    #[test]
    fn test_priority_one_decimal_digit() {
        let one = crate::types::SitemapUrl::new("https://example.com").with_priority(1.0);
        let xml = build_url_set_xml(&[one.into()]);
        assert!(xml.contains("<priority>1.0</priority>"));

        let zero = crate::types::SitemapUrl::new("https://example.com").with_priority(0.0);
        let xml = build_url_set_xml(&[zero.into()]);
        assert!(xml.contains("<priority>0.0</priority>"));
    }

    #[test]
    fn test_ampersand_escaping() {
        let xml = build_url_set_xml(&["https://example.com?a=1&b=2".into()]);
        assert!(xml.contains("&amp;"));
        assert!(!xml.contains("?a=1&b=2</loc>"));
    }

    #[test]
    fn test_all_entities_escaped() {
        assert_eq!(
            escape_xml(r#"<a href="x">it's & more</a>"#),
            "&lt;a href=&quot;x&quot;&gt;it&apos;s &amp; more&lt;/a&gt;"
        );
    }

    #[test]
    fn test_sitemap_index() {
        let urls = vec![
            "https://example.com/seo/pages-1.xml".to_string(),
            "https://example.com/seo/pages-2.xml".to_string(),
        ];
        let xml = build_sitemap_index_xml(&urls);
        assert!(xml.starts_with(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"
        ));
        assert!(xml.contains("<sitemap><loc>https://example.com/seo/pages-1.xml</loc></sitemap>"));
        assert!(xml.contains("<sitemap><loc>https://example.com/seo/pages-2.xml</loc></sitemap>"));
        assert!(xml.ends_with("</sitemapindex>"));

        // index order follows input order
        let first = xml.find("pages-1.xml").unwrap_or(usize::MAX);
        let second = xml.find("pages-2.xml").unwrap_or(0);
        assert!(first < second);
    }

    #[test]
    fn test_empty_index() {
        let xml = build_sitemap_index_xml(&[]);
        assert!(xml.ends_with("<sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"></sitemapindex>"));
    }
}
