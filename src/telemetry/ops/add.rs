use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Add;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Fetch, Extract, Plan, Write }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Fetch => "fetch",
        Phase::Extract => "extract",
        Phase::Plan => "plan",
        Phase::Write => "write",
    }}
    fn span(&self) -> Span { match self {
        Phase::Fetch => info_span!("fetch"),
        Phase::Extract => info_span!("extract"),
        Phase::Plan => info_span!("plan"),
        Phase::Write => info_span!("write"),
    }}
}

impl OpMarker for Add {
    const NAME: &'static str = "add";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("add") }
}
