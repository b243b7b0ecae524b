pub mod config;
pub mod ctx;
pub mod emit;
pub mod ops;

use ctx::LogCtx;

pub fn init() -> LogCtx<ops::init::Init> { LogCtx::new(config::logs_are_json()) }
pub fn add() -> LogCtx<ops::add::Add> { LogCtx::new(config::logs_are_json()) }
pub fn track() -> LogCtx<ops::track::Track> { LogCtx::new(config::logs_are_json()) }
