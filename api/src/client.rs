use crate::statsapi::{
    ApiTeam, GameSide, LiveFeedResponse, ScheduleGame, ScheduleResponse, TeamsResponse,
};
use crate::{
    COMPLETED_STATUS, GameOutcome, IN_PROGRESS_STATUSES, LEAGUE_IDS, LiveDetails,
    LiveGameSnapshot, LiveTeamLine, REGULAR_SEASON, SPORT_ID, Team,
};
use chrono::NaiveDate;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const STATSAPI_BASE: &str = "https://statsapi.mlb.com";

/// MLB Stats API client.
#[derive(Debug, Clone)]
pub struct MlbApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for MlbApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("bandwagon/0.1 (season lineage tracer)")
                .build()
                .unwrap_or_default(),
            base_url: STATSAPI_BASE.to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl MlbApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different host. Used by tests against a local
    /// mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    /// Fetch the active AL/NL clubs, sorted by name.
    pub async fn fetch_teams(&self) -> ApiResult<Vec<Team>> {
        let url = format!("{}/api/v1/teams?sportId={SPORT_ID}", self.base_url);
        let raw: TeamsResponse = self.get(&url).await?;
        let mut teams: Vec<Team> = raw
            .teams
            .unwrap_or_default()
            .iter()
            .filter(|t| {
                t.active.unwrap_or(false)
                    && t.sport.as_ref().and_then(|s| s.id) == Some(SPORT_ID)
                    && t.league
                        .as_ref()
                        .and_then(|l| l.id)
                        .is_some_and(|id| LEAGUE_IDS.contains(&id))
            })
            .filter_map(map_team)
            .collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(teams)
    }

    /// Fetch one team's metadata.
    pub async fn fetch_team(&self, team_id: u32) -> ApiResult<Team> {
        let url = format!("{}/api/v1/teams/{team_id}", self.base_url);
        let raw: TeamsResponse = self.get(&url).await?;
        raw.teams
            .unwrap_or_default()
            .first()
            .and_then(map_team)
            .ok_or_else(|| ApiError::NotFound(format!("no team metadata for id {team_id}")))
    }

    /// Fetch a team's regular-season schedule for an inclusive date window.
    /// Returns the raw payload; see [`game_outcomes`] for the flattened view.
    pub async fn fetch_schedule(
        &self,
        team_id: u32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<ScheduleResponse> {
        let url = format!(
            "{}/api/v1/schedule/games/?sportId={SPORT_ID}&teamId={team_id}\
             &startDate={start}&endDate={end}&gameType={REGULAR_SEASON}",
            self.base_url
        );
        self.get(&url).await
    }

    /// Fetch a team's schedule for a single day, hydrated with linescores.
    /// This is the live-game surface: today's entry carries the in-progress
    /// status codes and the current inning.
    pub async fn fetch_schedule_for_date(
        &self,
        team_id: u32,
        date: NaiveDate,
    ) -> ApiResult<ScheduleResponse> {
        let url = format!(
            "{}/api/v1/schedule/games/?sportId={SPORT_ID}&date={date}&teamId={team_id}\
             &hydrate=team,linescore",
            self.base_url
        );
        self.get(&url).await
    }

    /// Fetch the current-play details for an in-progress game. A payload with
    /// no live section degrades to an all-zero [`LiveDetails`].
    pub async fn fetch_live_details(&self, game_pk: u64) -> ApiResult<LiveDetails> {
        let url = format!("{}/api/v1.1/game/{game_pk}/feed/live", self.base_url);
        let raw: LiveFeedResponse = self.get(&url).await?;
        Ok(map_live_details(raw))
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: statsapi wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_team(t: &ApiTeam) -> Option<Team> {
    Some(Team { id: t.id?, name: t.name.clone().unwrap_or_default() })
}

/// Flatten a raw schedule payload into completed regular-season outcomes from
/// `team_id`'s perspective, sorted ascending by date.
///
/// Keeps only final ("F") regular-season ("R") games on or after
/// `window_start` where the team appears as home or away. The score string is
/// always "<own>-<opponent>" regardless of side. Games missing any required
/// field are skipped rather than failing the caller.
///
/// The ascending order is load-bearing: the tracer's "next loss" is the first
/// loss in this list.
pub fn game_outcomes(
    raw: &ScheduleResponse,
    team_id: u32,
    window_start: NaiveDate,
) -> Vec<GameOutcome> {
    let mut outcomes: Vec<GameOutcome> = raw
        .dates
        .iter()
        .flatten()
        .flat_map(|d| d.games.iter().flatten())
        .filter_map(|g| map_outcome(g, team_id, window_start))
        .collect();
    outcomes.sort_by_key(|o| o.date);
    outcomes
}

fn map_outcome(g: &ScheduleGame, team_id: u32, window_start: NaiveDate) -> Option<GameOutcome> {
    if g.status.as_ref()?.status_code.as_deref() != Some(COMPLETED_STATUS) {
        return None;
    }
    if g.game_type.as_deref() != Some(REGULAR_SEASON) {
        return None;
    }
    let date = game_day(g)?;
    if date < window_start {
        return None;
    }

    let teams = g.teams.as_ref()?;
    let home = teams.home.as_ref()?;
    let away = teams.away.as_ref()?;
    let home_id = home.team.as_ref()?.id?;
    let away_id = away.team.as_ref()?.id?;

    let is_home = home_id == team_id;
    if !is_home && away_id != team_id {
        return None;
    }
    let (own, opponent) = if is_home { (home, away) } else { (away, home) };
    let own_score = own.score?;
    let opponent_score = opponent.score?;

    Some(GameOutcome {
        opponent_id: if is_home { away_id } else { home_id },
        date,
        team_won: own_score > opponent_score,
        score: format!("{own_score}-{opponent_score}"),
        is_home,
        game_pk: g.game_pk?,
    })
}

/// Calendar day of a game — the date portion of the ISO timestamp. All window
/// comparisons are date-only to avoid off-by-one from time-of-day.
fn game_day(g: &ScheduleGame) -> Option<NaiveDate> {
    let day = g.game_date.as_deref()?.split('T').next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// First game in a single-day payload whose status marks it as underway.
/// "Not started" and "final" both miss, so callers get `None` for them.
pub fn active_game(raw: &ScheduleResponse) -> Option<&ScheduleGame> {
    raw.dates
        .iter()
        .flatten()
        .flat_map(|d| d.games.iter().flatten())
        .find(|g| {
            g.status
                .as_ref()
                .and_then(|s| s.status_code.as_deref())
                .is_some_and(|code| IN_PROGRESS_STATUSES.contains(&code))
        })
}

/// Map a hydrated schedule entry plus optional feed details into a snapshot.
/// `None` when the entry is missing team lines.
pub fn live_snapshot(game: &ScheduleGame, details: Option<LiveDetails>) -> Option<LiveGameSnapshot> {
    let teams = game.teams.as_ref()?;
    Some(LiveGameSnapshot {
        game_pk: game.game_pk?,
        status: game
            .status
            .as_ref()
            .and_then(|s| s.detailed_state.clone())
            .unwrap_or_default(),
        home: map_line(teams.home.as_ref()?)?,
        away: map_line(teams.away.as_ref()?)?,
        inning: game.linescore.as_ref().and_then(|l| l.current_inning),
        inning_state: game.linescore.as_ref().and_then(|l| l.inning_state.clone()),
        details,
    })
}

fn map_line(side: &GameSide) -> Option<LiveTeamLine> {
    let team = side.team.as_ref()?;
    Some(LiveTeamLine {
        id: team.id?,
        name: team.name.clone().unwrap_or_default(),
        score: side.score.unwrap_or(0),
    })
}

fn map_live_details(raw: LiveFeedResponse) -> LiveDetails {
    let Some(live) = raw.live_data else {
        return LiveDetails::default();
    };
    let play = live.plays.and_then(|p| p.current_play);
    let count = play.as_ref().and_then(|p| p.count.clone()).unwrap_or_default();
    let matchup = play.as_ref().and_then(|p| p.matchup.clone()).unwrap_or_default();
    LiveDetails {
        balls: count.balls.unwrap_or(0),
        strikes: count.strikes.unwrap_or(0),
        outs: count.outs.unwrap_or(0),
        batter: matchup.batter.and_then(|b| b.full_name),
        pitcher: matchup.pitcher.and_then(|p| p.full_name),
        pitch_count: play.and_then(|p| p.pitch_number).unwrap_or(0),
    }
}
