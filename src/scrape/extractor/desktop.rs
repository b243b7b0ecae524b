use super::{non_empty, optional_attr, required_text, ExtractError, ExtractedFields};
use crate::scrape::document::Document;

const POSTER: &str = "div.poster > a > img";
const TITLE: &str = "div.title_wrapper > h1";
const SUBTEXT: &str = "div.titleBar > div.title_wrapper > div.subtext";

pub fn extract(doc: &Document) -> Result<ExtractedFields, ExtractError> {
    let poster_url = optional_attr(doc, POSTER, "src");
    let title = required_text(doc, TITLE, "title")?;
    let genres = doc.text_of(SUBTEXT).map(|s| pick_genre_segment(&s)).and_then(non_empty);
    Ok(ExtractedFields { title, poster_url, genres })
}

/// Positional pick over `<certification> | <runtime> | <genres> | <release date>`.
///
/// With one segment the whole subtext is used, otherwise the second-to-last
/// segment. Never fails; an out-of-range pick clamps to the first segment.
pub fn pick_genre_segment(subtext: &str) -> String {
    let segments: Vec<&str> = subtext.split('|').map(str::trim).collect();
    let idx = if segments.len() <= 1 { 0 } else { segments.len() - 2 };
    segments.get(idx).copied().unwrap_or_default().to_string()
}
