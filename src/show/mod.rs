use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::Instrument;

use crate::telemetry::{self};
use crate::telemetry::ops::track::Phase as TrackPhase;
use crate::util::time::now_epoch;

pub mod db;
pub mod types;

use db::ShowStore;
use types::{EditResult, RemoveResult, ShowList, ShowRecord};

/// show get <id>
#[derive(Args)]
pub struct GetCmd {
    pub id: i64,
}

/// show edit <id>: move the season/episode counters
#[derive(Args)]
pub struct EditCmd {
    pub id: i64,
    #[arg(long)]
    pub season: Option<u32>,
    #[arg(long, conflicts_with = "next_episode")]
    pub episode: Option<u32>,
    /// Bump the episode counter by one
    #[arg(long, default_value_t = false)]
    pub next_episode: bool,
}

/// show rm <id>
#[derive(Args)]
pub struct RmCmd {
    pub id: i64,
}

pub async fn ls(store: &dyn ShowStore) -> Result<()> {
    let log = telemetry::track();

    async {
        let shows = store.list_all().instrument(log.span(&TrackPhase::List)).await?;
        if shows.is_empty() {
            log.info("📺 No shows yet. Add one with `show add <url> --apply`.");
        } else {
            log.info(format!("📺 Shows ({}):", shows.len()));
        }
        for rec in &shows { log.record_line(rec); }
        log.result(&ShowList { shows })
    }
    .instrument(log.root_span())
    .await
}

pub async fn get(store: &dyn ShowStore, args: GetCmd) -> Result<()> {
    let log = telemetry::track();
    let root = log.root_span_kv([("id", args.id.to_string())]);

    async {
        let rec = find(store, args.id).instrument(log.span(&TrackPhase::Get)).await?;
        log.record_line(&rec);
        log.info(format!("   url={} poster={:?}", rec.source_url, rec.poster_url));
        log.result(&rec)
    }
    .instrument(root)
    .await
}

pub async fn edit(store: &dyn ShowStore, args: EditCmd) -> Result<()> {
    let log = telemetry::track();
    let root = log.root_span_kv([
        ("id", args.id.to_string()),
        ("season", format!("{:?}", args.season)),
        ("episode", format!("{:?}", args.episode)),
        ("next_episode", args.next_episode.to_string()),
    ]);

    async {
        let current = find(store, args.id).await?;
        let edited = edit_progress(&current, &args, now_epoch())?;
        let updated = store.update(&edited).instrument(log.span(&TrackPhase::Edit)).await?;
        if updated == 0 { bail!("show {} was removed before it could be saved", args.id); }
        log.info(format!(
            "✏️ {} — S{} E{}",
            edited.title, edited.season_progress, edited.episode_progress
        ));
        let result = EditResult {
            id: args.id,
            updated,
            season_progress: edited.season_progress,
            episode_progress: edited.episode_progress,
        };
        log.result(&result)
    }
    .instrument(root)
    .await
}

pub async fn rm(store: &dyn ShowStore, args: RmCmd) -> Result<()> {
    let log = telemetry::track();
    let root = log.root_span_kv([("id", args.id.to_string())]);

    async {
        let rec = find(store, args.id).await?;
        store.remove(&rec).instrument(log.span(&TrackPhase::Remove)).await?;
        log.info(format!("🗑️ Removed [{}] {}", args.id, rec.title));
        log.result(&RemoveResult { id: args.id, title: rec.title })
    }
    .instrument(root)
    .await
}

async fn find(store: &dyn ShowStore, id: i64) -> Result<ShowRecord> {
    store
        .find_by_id(id)
        .await?
        .with_context(|| format!("show {id} not found"))
}

/// Counters not mentioned on the command line keep their value.
fn edit_progress(current: &ShowRecord, args: &EditCmd, now: i64) -> Result<ShowRecord> {
    if args.season.is_none() && args.episode.is_none() && !args.next_episode {
        bail!("nothing to edit: pass --season, --episode or --next-episode");
    }
    let season = args.season.unwrap_or(current.season_progress);
    let episode = if args.next_episode {
        current.episode_progress.checked_add(1).context("episode counter overflow")?
    } else {
        args.episode.unwrap_or(current.episode_progress)
    };
    Ok(current.with_progress(season, episode, now))
}
