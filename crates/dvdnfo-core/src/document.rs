//! Parsed page documents and the queries extraction needs

use scraper::{ElementRef, Html, Selector};

use crate::error::{DvdNfoError, Result};

/// An element borrowed from a [`Document`]
pub type Element<'a> = ElementRef<'a>;

/// A parsed HTML page
pub struct Document {
    html: Html,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").finish_non_exhaustive()
    }
}

impl Document {
    /// Parse a full HTML document
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Root element of the document
    pub fn root(&self) -> Element<'_> {
        self.html.root_element()
    }

    /// Element with the given id attribute
    pub fn by_id(&self, id: &str) -> Option<Element<'_>> {
        self.root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().id() == Some(id))
    }

    /// Whether an element with the given id exists
    pub fn has_id(&self, id: &str) -> bool {
        self.by_id(id).is_some()
    }

    /// First element matching a CSS selector
    pub fn select_first(&self, css: &str) -> Result<Option<Element<'_>>> {
        select_first(self.root(), css)
    }
}

/// All elements under `scope` matching a CSS selector, in document order
pub fn select_all<'a>(scope: Element<'a>, css: &str) -> Result<Vec<Element<'a>>> {
    let selector = parse_selector(css)?;
    Ok(scope.select(&selector).collect())
}

/// First element under `scope` matching a CSS selector
pub fn select_first<'a>(scope: Element<'a>, css: &str) -> Result<Option<Element<'a>>> {
    let selector = parse_selector(css)?;
    let first = scope.select(&selector).next();
    Ok(first)
}

/// First `tag` element under `scope` whose trimmed text satisfies `predicate`
pub fn find_by_text<'a, P>(scope: Element<'a>, tag: &str, predicate: P) -> Result<Option<Element<'a>>>
where
    P: Fn(&str) -> bool,
{
    let found = select_all(scope, tag)?
        .into_iter()
        .find(|el| predicate(&text_of(*el)));
    Ok(found)
}

/// Nearest element ancestor
pub fn parent_element(el: Element<'_>) -> Option<Element<'_>> {
    el.ancestors().find_map(ElementRef::wrap)
}

/// Concatenated, trimmed text content
pub fn text_of(el: Element<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| DvdNfoError::Config(format!("Invalid selector '{}': {:?}", css, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <div id="mdp-details">
            <dl><div><dt>Genres</dt><dd>Action, Comedy</dd></div></dl>
            <dl><div><dt> This movie is </dt><dd>Tense</dd></div></dl>
        </div>
        <p class="synopsis">  A plot.  </p>
    </body></html>"#;

    #[test]
    fn test_by_id() {
        let doc = Document::parse(PAGE);
        assert!(doc.has_id("mdp-details"));
        assert!(!doc.has_id("ratingInfo"));
    }

    #[test]
    fn test_select_and_text() {
        let doc = Document::parse(PAGE);
        let synopsis = doc.select_first("p.synopsis").unwrap().unwrap();
        assert_eq!(text_of(synopsis), "A plot.");
    }

    #[test]
    fn test_find_by_text_and_parent() {
        let doc = Document::parse(PAGE);
        let details = doc.by_id("mdp-details").unwrap();

        let dt = find_by_text(details, "dt", |t| t.starts_with('T')).unwrap().unwrap();
        let parent = parent_element(dt).unwrap();
        let dd = select_first(parent, "dd").unwrap().unwrap();
        assert_eq!(text_of(dd), "Tense");

        assert!(find_by_text(details, "dt", |t| t == "Cast").unwrap().is_none());
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(PAGE);
        assert!(doc.select_first("p[").is_err());
    }
}
