use crate::cache::{ScheduleCache, TeamCache};
use anyhow::bail;
use chrono::{Datelike, NaiveDate};
use log::debug;
use mlb_api::client::MlbApi;
use mlb_api::{BandwagonResult, GameOutcome, JourneyStep, WinRecord};

/// The season-to-date window opens on March 1 regardless of when the trace
/// runs; mid-season and post-season calls both replay the full season.
pub const SEASON_START_MONTH: u32 = 3;
pub const SEASON_START_DAY: u32 = 1;

/// Every step advances the cursor at least one day, so a journey can never
/// hold more steps than a season has days. Crossing this bound means the
/// schedule data is corrupt and the trace must not be trusted.
const MAX_JOURNEY_STEPS: usize = 366;

/// Inclusive calendar-date query window for one trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SeasonWindow {
    /// Window for the season containing `today`: March 1 of today's year
    /// through today. No journey state persists between traces.
    pub fn for_today(today: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(today.year(), SEASON_START_MONTH, SEASON_START_DAY)
            .unwrap_or(today);
        Self { start, end: today }
    }
}

/// Walks the bandwagon chain: repeatedly find the current team's next loss,
/// hand the chain to the winner, and resume the day after.
///
/// Owns the two per-session caches. All remote failures inside a step degrade
/// to safe defaults (empty schedule, sentinel team) via the caches, so a
/// flaky network shortens the chain instead of aborting it.
pub struct BandwagonTracer {
    pub(crate) api: MlbApi,
    pub(crate) schedules: ScheduleCache,
    pub(crate) teams: TeamCache,
    pub(crate) window: SeasonWindow,
}

impl BandwagonTracer {
    pub fn new(api: MlbApi, window: SeasonWindow) -> Self {
        Self {
            api,
            schedules: ScheduleCache::new(),
            teams: TeamCache::new(),
            window,
        }
    }

    pub fn api(&self) -> &MlbApi {
        &self.api
    }

    pub fn window(&self) -> SeasonWindow {
        self.window
    }

    /// Trace the chain from `starting_team_id` to the present day.
    ///
    /// Each pass resolves the current team, pulls its qualifying games from
    /// the cursor date to the window end, accumulates wins until the first
    /// loss, and emits a step handing the chain to the winner. Terminal when
    /// no games remain, no loss remains, or the cursor passes the window end;
    /// the team holding the chain at that point is the final team.
    pub async fn trace(&mut self, starting_team_id: u32) -> anyhow::Result<BandwagonResult> {
        let mut current_id = starting_team_id;
        let mut cursor = self.window.start;
        let mut journey: Vec<JourneyStep> = Vec::new();

        'walk: while cursor <= self.window.end {
            if journey.len() > MAX_JOURNEY_STEPS {
                bail!("journey exceeded {MAX_JOURNEY_STEPS} steps; schedule data is inconsistent");
            }

            let current_team = self.teams.team(&self.api, current_id).await;
            let games = self
                .schedules
                .outcomes(&self.api, current_id, cursor, self.window.end)
                .await;
            if games.is_empty() {
                break;
            }

            let mut wins: Vec<WinRecord> = Vec::new();
            for game in &games {
                let opponent = self.teams.team(&self.api, game.opponent_id).await;
                if game.team_won {
                    wins.push(WinRecord {
                        opponent,
                        date: game.date,
                        score: game.score.clone(),
                        is_home: game.is_home,
                        game_pk: game.game_pk,
                    });
                    continue;
                }

                debug!(
                    "{} lost to {} on {} ({})",
                    current_team.name, opponent.name, game.date, game.score
                );
                journey.push(JourneyStep {
                    losing_team: current_team,
                    winning_team: opponent,
                    date: game.date,
                    score: game.score.clone(),
                    game_pk: game.game_pk,
                    wins,
                });
                current_id = game.opponent_id;
                let Some(next) = game.date.succ_opt() else {
                    break 'walk;
                };
                cursor = next;
                continue 'walk;
            }

            // The current team won every remaining game: end of the line.
            break;
        }

        let final_team = self.teams.team(&self.api, current_id).await;
        debug!(
            "trace complete: {} steps, final team {}",
            journey.len(),
            final_team.name
        );
        Ok(BandwagonResult { journey, final_team })
    }

    /// First loss for `team_id` on or after `start`, if any. The live
    /// observer uses this with a today-only window after a watched game ends.
    pub async fn find_next_loss(
        &mut self,
        team_id: u32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Option<GameOutcome> {
        let games = self.schedules.outcomes(&self.api, team_id, start, end).await;
        games.into_iter().find(|g| !g.team_won)
    }
}
