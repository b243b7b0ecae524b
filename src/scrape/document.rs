use scraper::{ElementRef, Html, Selector};

/// Parsed title page. Lookups always return the first match.
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    pub fn select_first(&self, css: &str) -> Option<ElementRef<'_>> {
        let sel = Selector::parse(css).ok()?;
        self.html.select(&sel).next()
    }

    /// Text of the first match with whitespace runs collapsed and trimmed.
    pub fn text_of(&self, css: &str) -> Option<String> {
        let node = self.select_first(css)?;
        Some(collapse_whitespace(&node.text().collect::<String>()))
    }

    pub fn attr_of(&self, css: &str, attr: &str) -> Option<String> {
        let node = self.select_first(css)?;
        node.value().attr(attr).map(|v| v.trim().to_string())
    }
}

fn collapse_whitespace(s: &str) -> String {
    let mut buf = String::with_capacity(s.len());
    let mut in_ws = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !in_ws {
                if !buf.is_empty() { buf.push(' '); }
                in_ws = true;
            }
        } else {
            buf.push(ch);
            in_ws = false;
        }
    }
    buf.trim().to_string()
}
