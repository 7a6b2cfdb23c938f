use crawldex_core::TextExtractor;
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use url::Url;

lazy_static! {
    static ref ANCHOR: Selector = Selector::parse("a[href]").expect("valid selector");
}

/// Plain text of an HTML document: every text node of the root, concatenated.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTextExtractor;

impl TextExtractor for HtmlTextExtractor {
    fn extract_text(&self, content: &str) -> String {
        let doc = Html::parse_document(content);
        doc.root_element().text().collect::<String>()
    }
}

/// Absolute http(s) targets of every `<a href>` on the page, in document order.
pub fn extract_links(html: &str, page_url: &Url) -> Vec<String> {
    let doc = Html::parse_document(html);
    let mut links = Vec::new();
    for a in doc.select(&ANCHOR) {
        if let Some(h) = a.value().attr("href") {
            if let Ok(u) = Url::parse(h).or_else(|_| page_url.join(h)) {
                if u.scheme().starts_with("http") {
                    links.push(u.to_string());
                }
            }
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html>
<head><title>ITER</title></head>
<body>
<h1>Fusion energy</h1>
<p>Plasma <b>physics</b></p>
<a href="/proj/inafewlines">In a few lines</a>
<a href="https://www.iter.org/faq#top">FAQ</a>
<a href="mailto:press@iter.org">Press</a>
<a href="sub/page.html">Relative</a>
<a>No target</a>
</body>
</html>"#;

    #[test]
    fn resolves_links_against_page_url() {
        let base = Url::parse("https://www.iter.org/proj/").unwrap();
        let links = extract_links(PAGE, &base);
        assert_eq!(
            links,
            vec![
                "https://www.iter.org/proj/inafewlines",
                "https://www.iter.org/faq#top",
                "https://www.iter.org/proj/sub/page.html",
            ]
        );
    }

    #[test]
    fn extracts_all_text_nodes() {
        let text = HtmlTextExtractor.extract_text(PAGE);
        assert!(text.contains("ITER"));
        assert!(text.contains("Fusion energy"));
        assert!(text.contains("Plasma physics"));
        assert!(!text.contains("<b>"));
    }
}
