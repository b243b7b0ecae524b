use serde::Serialize;
use thiserror::Error;

use super::document::Document;

mod desktop;
mod mobile;

/// Host substring that routes a link to the mobile layout.
pub const MOBILE_HOST_MARKER: &str = "m.imdb.com";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageVariant {
    Mobile,
    Desktop,
}

impl PageVariant {
    /// Decided from the link text alone, never from page content.
    pub fn of_url(url: &str) -> Self {
        if url.contains(MOBILE_HOST_MARKER) { PageVariant::Mobile } else { PageVariant::Desktop }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PageVariant::Mobile => "mobile",
            PageVariant::Desktop => "desktop",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExtractedFields {
    pub title: String,
    pub poster_url: Option<String>,
    pub genres: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
}

pub fn extract(doc: &Document, variant: PageVariant) -> Result<ExtractedFields, ExtractError> {
    match variant {
        PageVariant::Mobile => mobile::extract(doc),
        PageVariant::Desktop => desktop::extract(doc),
    }
}

// Field policy shared by both layouts: title is required, poster and genres degrade to None.

fn required_text(doc: &Document, css: &str, field: &'static str) -> Result<String, ExtractError> {
    doc.text_of(css)
        .filter(|t| !t.is_empty())
        .ok_or(ExtractError::MissingField(field))
}

fn optional_attr(doc: &Document, css: &str, attr: &str) -> Option<String> {
    doc.attr_of(css, attr).filter(|v| !v.is_empty())
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
