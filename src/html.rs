use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;

pub fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|err| ScrapeError::Parse(format!("selector {css:?}: {err}")))
}

pub fn first<'a>(doc: &'a Html, css: &str) -> Result<Option<ElementRef<'a>>, ScrapeError> {
    let selector = selector(css)?;
    Ok(doc.select(&selector).next())
}

/// Text content of `element`, leaving out text nested inside descendants named `skip`.
pub fn text_without(element: ElementRef<'_>, skip: &str) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let skipped = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != element.id())
            .any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| el.name() == skip)
            });
        if !skipped {
            out.push_str(text);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_drops_nested_elements() {
        let doc = Html::parse_fragment(
            r#"<p><time>2020-05-11 <span>NEW <b>!</b></span>12:34:56</time></p>"#,
        );
        let time = first(&doc, "time").unwrap().unwrap();
        assert_eq!(text_without(time, "span"), "2020-05-11 12:34:56");
    }

    #[test]
    fn invalid_selector_is_parse_error() {
        let err = selector("div[").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Parse);
    }
}
