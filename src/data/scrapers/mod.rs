//! Scrapers for nba.com pages
//!
//! Both pages are fetched through the ScrapingAnt proxy and matched against
//! the specific CSS class names nba.com currently ships. Any markup change
//! on the site breaks these parsers.

pub mod boxscores;
pub mod schedule;

use scraper::{ElementRef, Selector};

/// Collect href values of anchors carrying all of the given CSS classes,
/// in DOM order
pub(crate) fn anchor_hrefs(scope: ElementRef, classes: &str) -> Vec<String> {
    let css = format!("a.{}", classes.split_whitespace().collect::<Vec<_>>().join("."));
    let selector = Selector::parse(&css).unwrap();

    scope
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_anchor_hrefs_multi_class() {
        let html = Html::parse_document(
            r#"<div id="d">
                <a class="one two" href="/a">A</a>
                <a class="one" href="/b">B</a>
                <a class="two one extra" href="/c">C</a>
            </div>"#,
        );
        let selector = Selector::parse("#d").unwrap();
        let scope = html.select(&selector).next().unwrap();

        assert_eq!(anchor_hrefs(scope, "one two"), vec!["/a", "/c"]);
        assert_eq!(anchor_hrefs(scope, "one"), vec!["/a", "/b", "/c"]);
    }
}
