use super::{non_empty, optional_attr, required_text, ExtractError, ExtractedFields};
use crate::scrape::document::Document;

const POSTER: &str = "#titleOverview > div.media.titlemain__overview-media--mobile > a > img";
const TITLE: &str = "#titleOverview > div.media.overview-top > div > h1";
const SUBTEXT: &str = "#titleOverview > div.media.overview-top > div > p > span.itemprop";

pub fn extract(doc: &Document) -> Result<ExtractedFields, ExtractError> {
    let poster_url = optional_attr(doc, POSTER, "src");
    let title = required_text(doc, TITLE, "title")?;
    // the genre span is already the genre string, taken verbatim
    let genres = doc.text_of(SUBTEXT).and_then(non_empty);
    Ok(ExtractedFields { title, poster_url, genres })
}
