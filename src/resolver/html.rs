//! Logo hints embedded in a site's home page

use scraper::{Html, Selector};
use std::sync::LazyLock;

static MANIFEST_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"link[rel="manifest"]"#).expect("valid selector"));

/// Candidate selectors in priority order
static LOGO_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        r#"link[rel="icon"][type="image/svg+xml"]"#,
        r#"link[rel="shortcut icon"][type="image/svg+xml"]"#,
        r#"link[rel="icon"]"#,
        r#"link[rel="shortcut icon"]"#,
        r#"link[rel="apple-touch-icon"]"#,
        r#"meta[property="og:image"]"#,
        r#"img[src*="logo"][src$=".svg"]"#,
        r#"img[src*="logo"]"#,
    ]
    .iter()
    .map(|s| Selector::parse(s).expect("valid selector"))
    .collect()
});

/// Everything the resolver needs from a parsed home page
///
/// Extraction is synchronous and owns its output, so the parsed document
/// never lives across an await point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub manifest_href: Option<String>,
    /// One raw reference per matching selector, in selector order
    pub logo_candidates: Vec<String>,
}

impl PageLinks {
    pub fn extract(html: &str) -> Self {
        let document = Html::parse_document(html);

        let manifest_href = document
            .select(&MANIFEST_SELECTOR)
            .next()
            .and_then(|el| non_empty_attr(el.value(), "href"));

        let logo_candidates = LOGO_SELECTORS
            .iter()
            .filter_map(|selector| document.select(selector).next())
            .filter_map(|el| {
                let value = el.value();
                non_empty_attr(value, "href")
                    .or_else(|| non_empty_attr(value, "content"))
                    .or_else(|| non_empty_attr(value, "src"))
            })
            .collect();

        Self {
            manifest_href,
            logo_candidates,
        }
    }
}

fn non_empty_attr(element: &scraper::node::Element, name: &str) -> Option<String> {
    element
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
