use anyhow::{bail, Result};
use clap::Args;
use thiserror::Error;
use tracing::Instrument;

use crate::show::db::ShowStore;
use crate::show::types::{AddPlan, AddResult, ShowRecord};
use crate::telemetry::{self};
use crate::telemetry::ops::add::Phase as AddPhase;
use crate::util::time::now_epoch;

pub mod document;
pub mod extractor;
pub mod fetch;
#[cfg(test)]
mod testutil;

use extractor::PageVariant;
use fetch::{FetchError, Fetcher};

/// show add <url>
#[derive(Args)]
pub struct AddCmd {
    /// Link to the title page (www.imdb.com or m.imdb.com)
    pub url: String,
    /// Save the scraped show; without it only the preview is shown
    #[arg(long, default_value_t = false)]
    pub apply: bool,
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extract(#[from] extractor::ExtractError),
}

pub async fn run(store: &dyn ShowStore, fetcher: &Fetcher, args: AddCmd) -> Result<()> {
    let log = telemetry::add();
    let root = log.root_span_kv([
        ("mode", if args.apply { "apply".to_string() } else { "plan".to_string() }),
        ("url", args.url.clone()),
    ]);

    async {
        let Some(record) = create_from_link(fetcher, &args.url, now_epoch()).await else {
            bail!("Failed to process {}", args.url);
        };

        if !args.apply {
            let _s = log.span(&AddPhase::Plan).entered();
            log.info(format!(
                "📝 Add plan — title={:?} genres={:?} poster={:?}",
                record.title, record.genres, record.poster_url
            ));
            log.info("   Use --apply to save.");
            let plan = AddPlan { variant: PageVariant::of_url(&args.url), record };
            return log.plan(&plan);
        }

        let id = store.add(&record).instrument(log.span(&AddPhase::Write)).await?;
        log.info(format!("➕ Added [{}] {}", id, record.title));
        log.result(&AddResult { id, title: record.title })
    }
    .instrument(root)
    .await
}

/// Fetch, then extract with the layout chosen from the link. No I/O after the fetch.
pub async fn scrape_link(fetcher: &Fetcher, url: &str, now: i64) -> Result<ShowRecord, ScrapeError> {
    let log = telemetry::add();
    let doc = fetcher
        .fetch(url)
        .instrument(log.span_kv(&AddPhase::Fetch, [("url", url.to_string())]))
        .await?;
    let variant = PageVariant::of_url(url);
    let fields = {
        let _s = log.span_kv(&AddPhase::Extract, [("variant", variant.name().to_string())]).entered();
        extractor::extract(&doc, variant)?
    };
    log.extracted(variant, &fields);
    Ok(ShowRecord::from_extracted(url, fields, now))
}

/// Caller-facing form of [`scrape_link`]: any failure is just `None`.
pub async fn create_from_link(fetcher: &Fetcher, url: &str, now: i64) -> Option<ShowRecord> {
    match scrape_link(fetcher, url, now).await {
        Ok(record) => Some(record),
        Err(e) => {
            telemetry::add().warn_kv("⚠️ scrape failed", [("url", url.to_string()), ("cause", e.to_string())]);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::open_memory_pool;
    use crate::show::db::SqliteShowStore;
    use crate::show::types::ShowStatus;
    use extractor::ExtractError;
    use testutil::{closed_port_url, serve_once};

    const DESKTOP_PAGE: &str = r#"
    <html><body>
      <div class="poster"><a href="/title/tt4154796/mediaviewer"><img src="https://m.media-amazon.com/images/M/endgame.jpg"></a></div>
      <div class="titleBar">
        <div class="title_wrapper">
          <h1>Avengers: Endgame</h1>
          <div class="subtext">PG-13 | 1h 58min | Action, Adventure | 3 May 2019</div>
        </div>
      </div>
    </body></html>
    "#;

    const NO_TITLE_PAGE: &str = r#"<html><body><div class="poster"><a><img src="x.jpg"></a></div></body></html>"#;

    #[tokio::test]
    async fn scraped_record_is_fresh_and_keeps_the_input_url() {
        let url = serve_once("200 OK", DESKTOP_PAGE).await;
        let rec = create_from_link(&Fetcher::direct_for_tests(), &url, 1_700_000_000).await.unwrap();

        assert_eq!(rec.id, None);
        assert_eq!(rec.source_url, url);
        assert_eq!(rec.title, "Avengers: Endgame");
        assert_eq!(rec.poster_url, "https://m.media-amazon.com/images/M/endgame.jpg");
        assert_eq!(rec.genres.as_deref(), Some("Action, Adventure"));
        assert_eq!(rec.season_progress, 0);
        assert_eq!(rec.episode_progress, 0);
        assert_eq!(rec.status, ShowStatus::Watching);
        assert_eq!(rec.record_updated_at, 1_700_000_000);
    }

    #[tokio::test]
    async fn blank_link_fails_before_fetching() {
        let fetcher = Fetcher::direct_for_tests();
        let err = scrape_link(&fetcher, "  ", 0).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Fetch(FetchError::InvalidInput(_))));
        assert!(create_from_link(&fetcher, "", 0).await.is_none());
    }

    #[tokio::test]
    async fn page_without_title_is_a_missing_field() {
        let url = serve_once("200 OK", NO_TITLE_PAGE).await;
        let err = scrape_link(&Fetcher::direct_for_tests(), &url, 0).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Extract(ExtractError::MissingField("title"))));
    }

    #[tokio::test]
    async fn unreachable_host_collapses_to_none() {
        let url = closed_port_url().await;
        assert!(create_from_link(&Fetcher::direct_for_tests(), &url, 0).await.is_none());
    }

    #[tokio::test]
    async fn plan_mode_writes_nothing() {
        let store = SqliteShowStore::new(open_memory_pool().await.unwrap());
        let url = serve_once("200 OK", DESKTOP_PAGE).await;
        run(&store, &Fetcher::direct_for_tests(), AddCmd { url, apply: false }).await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn apply_mode_saves_the_show() {
        let store = SqliteShowStore::new(open_memory_pool().await.unwrap());
        let url = serve_once("200 OK", DESKTOP_PAGE).await;
        run(&store, &Fetcher::direct_for_tests(), AddCmd { url: url.clone(), apply: true }).await.unwrap();

        let saved = store.list_all().await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].title, "Avengers: Endgame");
        assert_eq!(saved[0].source_url, url);
        assert!(saved[0].id.is_some());
    }

    #[tokio::test]
    async fn failed_scrape_reaches_no_store() {
        let store = SqliteShowStore::new(open_memory_pool().await.unwrap());
        let url = serve_once("200 OK", NO_TITLE_PAGE).await;
        let err = run(&store, &Fetcher::direct_for_tests(), AddCmd { url, apply: true }).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to process"));
        assert!(store.list_all().await.unwrap().is_empty());
    }
}
