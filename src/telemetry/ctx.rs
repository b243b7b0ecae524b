use anyhow::Result;
use serde::Serialize;
use std::marker::PhantomData;
use std::time::Instant;
use tracing::{debug, info, warn, Span};

use super::emit;
use crate::output::types::Meta;
use super::ops::add::Add;
use super::ops::track::Track;
use crate::scrape::extractor::{ExtractedFields, PageVariant};
use crate::show::types::ShowRecord;

pub trait PhaseSpan {
    fn name(&self) -> &'static str;
    fn span(&self) -> Span;
}

pub trait OpMarker {
    const NAME: &'static str;
    type Phase: PhaseSpan;
    fn root_span() -> Span;
}

/// Log context typed by the command it belongs to.
pub struct LogCtx<O: OpMarker> {
    json: bool,
    started: Instant,
    _marker: PhantomData<O>,
}

impl<O: OpMarker> LogCtx<O> {
    pub fn new(json: bool) -> Self { Self { json, started: Instant::now(), _marker: PhantomData } }

    fn op_name(&self) -> &'static str { O::NAME }

    pub fn root_span(&self) -> Span { O::root_span() }

    pub fn root_span_kv<'a, T>(&self, fields: T) -> Span
    where
        T: IntoIterator<Item = (&'a str, String)>,
    {
        let span = self.root_span();
        let details = kv_to_string(fields);
        if details.is_empty() {
            info!(op = %self.op_name(), "start");
        } else {
            info!(op = %self.op_name(), details = %details, "start");
        }
        span
    }

    pub fn span(&self, ph: &O::Phase) -> Span { ph.span() }

    pub fn span_kv<'a, T>(&self, ph: &O::Phase, fields: T) -> Span
    where
        T: IntoIterator<Item = (&'a str, String)>,
    {
        let span = self.span(ph);
        let details = kv_to_string(fields);
        debug!(op = %self.op_name(), phase = ph.name(), details = %details, "span_start");
        span
    }

    pub fn info(&self, msg: impl AsRef<str>) { if self.json { info!(op = %self.op_name(), "{}", msg.as_ref()); } else { info!("{}", msg.as_ref()); } }
    pub fn debug(&self, msg: impl AsRef<str>) { if self.json { debug!(op = %self.op_name(), "{}", msg.as_ref()); } else { debug!("{}", msg.as_ref()); } }

    pub fn warn_kv<'a, D>(&self, msg: &str, kv: D)
    where
        D: IntoIterator<Item = (&'a str, String)>,
    {
        let details = kv_to_string(kv);
        if self.json { warn!(op = %self.op_name(), details = %details, "{}", msg); }
        else { warn!("{} {}", msg, details); }
    }

    pub fn plan<T: Serialize>(&self, plan: &T) -> Result<()> { emit::print_plan(self.op_name(), plan, Some(Meta::since(self.started))) }
    pub fn result<T: Serialize>(&self, result: &T) -> Result<()> { emit::print_result(self.op_name(), result, Some(Meta::since(self.started))) }
}

impl LogCtx<Add> {
    pub fn extracted(&self, variant: PageVariant, fields: &ExtractedFields) {
        let poster = fields.poster_url.as_deref().unwrap_or("");
        let genres = fields.genres.as_deref().unwrap_or("");
        if self.json { debug!(op = %self.op_name(), variant = variant.name(), title = %fields.title, poster = %poster, genres = %genres, "extracted"); }
        else { debug!("🔎 {} page — title={:?} poster={:?} genres={:?}", variant.name(), fields.title, poster, genres); }
    }
}

impl LogCtx<Track> {
    pub fn record_line(&self, rec: &ShowRecord) {
        let id = rec.id.map(|i| i.to_string()).unwrap_or_else(|| "-".to_string());
        let genres = rec.genres.as_deref().unwrap_or("");
        if self.json {
            info!(op = %self.op_name(), id = %id, title = %rec.title, genres = %genres,
                season = rec.season_progress, episode = rec.episode_progress, status = rec.status.label(), "show");
        } else {
            info!("[{}] {} ({}) S{} E{} {}", id, rec.title, genres, rec.season_progress, rec.episode_progress, rec.status.label());
        }
    }
}

fn kv_to_string<'a, T>(kv: T) -> String
where
    T: IntoIterator<Item = (&'a str, String)>,
{
    let mut parts: Vec<String> = Vec::new();
    for (k, v) in kv { parts.push(format!("{}={}", k, v)); }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_pairs_render_in_order() {
        let s = kv_to_string([("url", "https://m.imdb.com/title/tt1/".to_string()), ("variant", "mobile".to_string())]);
        assert_eq!(s, "url=https://m.imdb.com/title/tt1/ variant=mobile");
        assert_eq!(kv_to_string(Vec::<(&str, String)>::new()), "");
    }
}
