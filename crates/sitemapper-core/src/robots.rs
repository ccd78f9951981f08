//! robots.txt rendering.

use crate::types::{RobotsConfig, RobotsRule};

fn build_rule_block(rule: &RobotsRule) -> String {
    let mut lines = vec![format!("User-agent: {}", rule.user_agent)];
    for path in &rule.allow {
        lines.push(format!("Allow: {path}"));
    }
    for path in &rule.disallow {
        lines.push(format!("Disallow: {path}"));
    }
    lines.join("\n")
}

/// Renders a robots.txt body from the given config.
///
/// Rule blocks come first (or the default permissive `User-agent: *` block
/// when no rules are configured), followed by one block per `Sitemap:`
/// reference and the verbatim `custom` trailer. Blocks are separated by a
/// blank line; the output always ends with exactly one trailing newline.
#[must_use]
pub fn build_robots_txt(config: &RobotsConfig) -> String {
    let mut parts: Vec<String> = Vec::new();

    if config.rules.is_empty() {
        parts.push("User-agent: *\nAllow: /".to_string());
    } else {
        let blocks: Vec<String> = config.rules.iter().map(build_rule_block).collect();
        parts.push(blocks.join("\n\n"));
    }

    if let Some(sitemap_url) = &config.sitemap_url {
        parts.push(format!("Sitemap: {sitemap_url}"));
    }
    for url in &config.additional_sitemaps {
        parts.push(format!("Sitemap: {url}"));
    }
    if let Some(custom) = &config.custom {
        parts.push(custom.clone());
    }

    parts.join("\n\n") + "\n"
}
