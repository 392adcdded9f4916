//! Bandwagon tracing engine.
//!
//! Starting from a chosen club, walk forward through the season's completed
//! games, hopping to whichever team dealt the current team its most recent
//! loss, until the chain reaches the present day. The result is the journey
//! of loss handoffs plus the one team the fan should now be rooting for,
//! optionally augmented with that team's current win streak and a live view
//! of its in-progress game.
//!
//! The engine is presentation-agnostic: a front end drives it through
//! [`worker::EngineWorker`] over channels and renders the updates it emits.

pub mod cache;
pub mod live;
pub mod streak;
pub mod tracer;
pub mod worker;

#[cfg(test)]
pub(crate) mod testutil;

pub use mlb_api::client::MlbApi;
pub use mlb_api::{BandwagonResult, JourneyStep, LiveGameSnapshot, Team, WinRecord};
pub use tracer::{BandwagonTracer, SeasonWindow};
