use chrono::NaiveDate;
use log::warn;
use mlb_api::client::{MlbApi, game_outcomes};
use mlb_api::{GameOutcome, Team};
use std::collections::HashMap;

/// Memoized schedule lookups, keyed by the exact (team, start, end) triple.
///
/// No range merging or overlap detection: a miss always fetches the full
/// requested window, even when a wider cached window would cover it. Entries
/// live for the cache's lifetime (one session); the key space is bounded by
/// the number of distinct windows one trace walks, so there is no eviction.
#[derive(Debug, Default)]
pub struct ScheduleCache {
    entries: HashMap<(u32, NaiveDate, NaiveDate), Vec<GameOutcome>>,
}

impl ScheduleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed regular-season outcomes for `team_id` in `[start, end]`,
    /// served from cache when this exact window was fetched before.
    ///
    /// This is the declared-default fetch wrapper: a remote failure logs and
    /// degrades to an empty list instead of propagating. Failures are not
    /// cached, so a later call for the same window can still populate it.
    pub async fn outcomes(
        &mut self,
        api: &MlbApi,
        team_id: u32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<GameOutcome> {
        let key = (team_id, start, end);
        if let Some(hit) = self.entries.get(&key) {
            return hit.clone();
        }
        match api.fetch_schedule(team_id, start, end).await {
            Ok(raw) => {
                let outcomes = game_outcomes(&raw, team_id, start);
                self.entries.insert(key, outcomes.clone());
                outcomes
            }
            Err(e) => {
                warn!("schedule fetch failed for team {team_id} ({start}..{end}): {e}");
                Vec::new()
            }
        }
    }

    /// Drop one window, forcing the next lookup back to the remote. Used when
    /// a watched game completes and the cached entry predates its result.
    pub fn invalidate(&mut self, team_id: u32, start: NaiveDate, end: NaiveDate) {
        self.entries.remove(&(team_id, start, end));
    }
}

/// Memoized team identity lookups.
///
/// Never fails: a lookup that errors out resolves to the "Unknown Team"
/// sentinel so a trace can keep walking. The sentinel is cached like a real
/// hit and is therefore sticky — a transient failure pins "Unknown Team" for
/// the rest of the session even if the remote recovers. Deliberately kept:
/// re-fetching on every hit would let one id resolve to different identities
/// mid-trace. TODO: evict sentinels on a successful `fetch_teams` refresh.
#[derive(Debug, Default)]
pub struct TeamCache {
    entries: HashMap<u32, Team>,
}

impl TeamCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn team(&mut self, api: &MlbApi, team_id: u32) -> Team {
        if let Some(hit) = self.entries.get(&team_id) {
            return hit.clone();
        }
        let team = match api.fetch_team(team_id).await {
            Ok(team) => team,
            Err(e) => {
                warn!("team lookup failed for id {team_id}: {e}");
                Team::unknown(team_id)
            }
        };
        self.entries.insert(team_id, team.clone());
        team
    }
}
