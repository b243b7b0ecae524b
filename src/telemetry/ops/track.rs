use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

/// Everything done to already-saved shows: ls, get, edit, rm.
#[derive(Copy, Clone, Debug)]
pub struct Track;

#[derive(Copy, Clone, Debug)]
pub enum Phase { List, Get, Edit, Remove }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::List => "list",
        Phase::Get => "get",
        Phase::Edit => "edit",
        Phase::Remove => "remove",
    }}
    fn span(&self) -> Span { match self {
        Phase::List => info_span!("list"),
        Phase::Get => info_span!("get"),
        Phase::Edit => info_span!("edit"),
        Phase::Remove => info_span!("remove"),
    }}
}

impl OpMarker for Track {
    const NAME: &'static str = "track";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("track") }
}
