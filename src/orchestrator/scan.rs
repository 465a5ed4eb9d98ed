//! Contest discovery.
//!
//! Harvests anchor hrefs from the fixed hub pages and boils them down to a
//! deduplicated, sorted list of contest URLs.

use std::collections::BTreeSet;

use anyhow::Result;
use tracing::{info, warn};

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::infrastructure::PageDriver;

const HREFS_JS: &str =
    "(function() { return Array.from(document.querySelectorAll('a')).map(a => a.href); })()";

/// Collect candidate contest URLs from the configured hubs.
///
/// Unreachable hubs are skipped; an empty result is a valid outcome. The
/// discovery tab is closed on every path.
pub async fn discover_contests(session: &BrowserSession, config: &Config) -> Result<Vec<String>> {
    let page = session.new_page().await?;
    let driver = PageDriver::new(page);

    let mut hrefs: Vec<String> = Vec::new();
    for hub in &config.hub_urls {
        info!("🔍 scanning hub: {}", hub);
        if let Err(e) = driver.goto(hub, config.discovery_timeout).await {
            warn!("⚠️ hub unreachable, skipping: {}", e);
            continue;
        }
        match driver.eval_as::<Vec<String>>(HREFS_JS).await {
            Ok(found) => hrefs.extend(found),
            Err(e) => warn!("⚠️ link harvest failed on {}: {}", hub, e),
        }
    }
    driver.close().await;

    Ok(normalize_candidates(
        &hrefs,
        &config.site_root,
        &config.contest_prefix,
    ))
}

/// Resolve, filter, canonicalize and dedupe raw hrefs.
///
/// Root-relative links are resolved against the site root, only links under
/// the contest prefix survive, and query strings are stripped so the same
/// contest linked twice collapses to one candidate.
fn normalize_candidates(hrefs: &[String], site_root: &str, prefix: &str) -> Vec<String> {
    let mut set = BTreeSet::new();
    for href in hrefs {
        let href = href.trim();
        if href.is_empty() {
            continue;
        }
        let absolute = if href.starts_with('/') {
            format!("{}{}", site_root, href)
        } else {
            href.to_string()
        };
        if !absolute.starts_with(prefix) {
            continue;
        }
        let canonical = absolute.split('?').next().unwrap_or(&absolute).to_string();
        set.insert(canonical);
    }
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "https://www.filmweb.pl";
    const PREFIX: &str = "https://www.filmweb.pl/contest/";

    #[test]
    fn query_string_variants_collapse_to_one_candidate() {
        let hrefs = vec![
            "https://www.filmweb.pl/contest/Quiz?ref=home".to_string(),
            "https://www.filmweb.pl/contest/Quiz?utm=banner".to_string(),
            "https://www.filmweb.pl/contest/Quiz".to_string(),
        ];
        let candidates = normalize_candidates(&hrefs, ROOT, PREFIX);
        assert_eq!(candidates, vec!["https://www.filmweb.pl/contest/Quiz"]);
    }

    #[test]
    fn root_relative_links_resolve_against_the_site_root() {
        let hrefs = vec!["/contest/Premiera".to_string()];
        let candidates = normalize_candidates(&hrefs, ROOT, PREFIX);
        assert_eq!(
            candidates,
            vec!["https://www.filmweb.pl/contest/Premiera"]
        );
    }

    #[test]
    fn non_contest_links_are_dropped() {
        let hrefs = vec![
            "https://www.filmweb.pl/film/Diuna".to_string(),
            "https://example.com/contest/Fake".to_string(),
            "/ranking".to_string(),
            "".to_string(),
        ];
        assert!(normalize_candidates(&hrefs, ROOT, PREFIX).is_empty());
    }

    #[test]
    fn candidates_come_back_sorted() {
        let hrefs = vec![
            "https://www.filmweb.pl/contest/Zeta".to_string(),
            "https://www.filmweb.pl/contest/Alfa".to_string(),
        ];
        let candidates = normalize_candidates(&hrefs, ROOT, PREFIX);
        assert_eq!(
            candidates,
            vec![
                "https://www.filmweb.pl/contest/Alfa",
                "https://www.filmweb.pl/contest/Zeta"
            ]
        );
    }
}
