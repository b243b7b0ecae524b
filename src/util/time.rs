use chrono::Utc;

/// Seconds since the Unix epoch, UTC. Record timestamps use this resolution.
pub fn now_epoch() -> i64 {
    Utc::now().timestamp()
}
