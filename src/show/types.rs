use serde::Serialize;

use crate::scrape::extractor::{ExtractedFields, PageVariant};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShowStatus {
    #[default]
    Watching,
    Paused,
    Ended,
    Movie,
}

impl ShowStatus {
    // stored as the ordinal
    pub fn ordinal(self) -> i64 {
        match self {
            ShowStatus::Watching => 0,
            ShowStatus::Paused => 1,
            ShowStatus::Ended => 2,
            ShowStatus::Movie => 3,
        }
    }

    pub fn from_ordinal(v: i64) -> Option<Self> {
        match v {
            0 => Some(ShowStatus::Watching),
            1 => Some(ShowStatus::Paused),
            2 => Some(ShowStatus::Ended),
            3 => Some(ShowStatus::Movie),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShowStatus::Watching => "Watching",
            ShowStatus::Paused => "Paused",
            ShowStatus::Ended => "Ended",
            ShowStatus::Movie => "Movie",
        }
    }
}

/// One tracked show. `id` is `None` until the store assigns one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShowRecord {
    pub id: Option<i64>,
    pub title: String,
    pub source_url: String,
    pub poster_url: String,
    pub genres: Option<String>,
    pub season_progress: u32,
    pub episode_progress: u32,
    pub progress_updated_at: i64,
    pub record_updated_at: i64,
    pub status: ShowStatus,
}

impl ShowRecord {
    /// Fresh, unsaved record for a scraped page. A missing poster is stored as "".
    pub fn from_extracted(source_url: &str, fields: ExtractedFields, now: i64) -> Self {
        Self {
            id: None,
            title: fields.title,
            source_url: source_url.to_string(),
            poster_url: fields.poster_url.unwrap_or_default(),
            genres: fields.genres,
            season_progress: 0,
            episode_progress: 0,
            progress_updated_at: now,
            record_updated_at: now,
            status: ShowStatus::Watching,
        }
    }

    /// Counter edit. Everything but the counters and their timestamp is kept.
    pub fn with_progress(&self, season: u32, episode: u32, now: i64) -> Self {
        Self {
            season_progress: season,
            episode_progress: episode,
            progress_updated_at: now,
            ..self.clone()
        }
    }
}

// Plan/result envelope payloads

#[derive(Serialize)]
pub struct AddPlan {
    pub variant: PageVariant,
    pub record: ShowRecord,
}

#[derive(Serialize)]
pub struct AddResult {
    pub id: i64,
    pub title: String,
}

#[derive(Serialize)]
pub struct ShowList {
    pub shows: Vec<ShowRecord>,
}

#[derive(Serialize)]
pub struct EditResult {
    pub id: i64,
    pub updated: u64,
    pub season_progress: u32,
    pub episode_progress: u32,
}

#[derive(Serialize)]
pub struct RemoveResult {
    pub id: i64,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraped() -> ShowRecord {
        let fields = ExtractedFields {
            title: "Dark".into(),
            poster_url: None,
            genres: Some("Crime, Drama, Mystery".into()),
        };
        ShowRecord::from_extracted("https://www.imdb.com/title/tt5753856/", fields, 1_600_000_000)
    }

    #[test]
    fn new_record_defaults() {
        let rec = scraped();
        assert_eq!(rec.id, None);
        assert_eq!(rec.season_progress, 0);
        assert_eq!(rec.episode_progress, 0);
        assert_eq!(rec.status, ShowStatus::Watching);
        assert_eq!(rec.poster_url, "");
        assert_eq!(rec.progress_updated_at, 1_600_000_000);
        assert_eq!(rec.record_updated_at, 1_600_000_000);
    }

    #[test]
    fn progress_edit_touches_only_counters() {
        let mut rec = scraped();
        rec.id = Some(4);
        rec.status = ShowStatus::Paused;
        let edited = rec.with_progress(2, 7, 1_700_000_000);

        assert_eq!(edited.season_progress, 2);
        assert_eq!(edited.episode_progress, 7);
        assert_eq!(edited.progress_updated_at, 1_700_000_000);

        assert_eq!(edited.id, rec.id);
        assert_eq!(edited.title, rec.title);
        assert_eq!(edited.source_url, rec.source_url);
        assert_eq!(edited.poster_url, rec.poster_url);
        assert_eq!(edited.genres, rec.genres);
        assert_eq!(edited.status, rec.status);
        assert_eq!(edited.record_updated_at, rec.record_updated_at);
    }

    #[test]
    fn status_ordinals_round_trip() {
        for s in [ShowStatus::Watching, ShowStatus::Paused, ShowStatus::Ended, ShowStatus::Movie] {
            assert_eq!(ShowStatus::from_ordinal(s.ordinal()), Some(s));
        }
        assert_eq!(ShowStatus::from_ordinal(9), None);
        assert_eq!(ShowStatus::default().label(), "Watching");
    }
}
