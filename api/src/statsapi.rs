/// MLB Stats API raw wire types — serde shapes for deserializing statsapi
/// responses. These map to our clean domain types via the functions in client.rs.
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Teams  (/api/v1/teams, /api/v1/teams/{id})
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamsResponse {
    pub teams: Option<Vec<ApiTeam>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ApiTeam {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub active: Option<bool>,
    pub sport: Option<IdRef>,
    pub league: Option<IdRef>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct IdRef {
    pub id: Option<u32>,
}

// ---------------------------------------------------------------------------
// Schedule  (/api/v1/schedule/games/)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleResponse {
    pub dates: Option<Vec<ScheduleDate>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleDate {
    pub date: Option<String>,
    pub games: Option<Vec<ScheduleGame>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleGame {
    pub game_pk: Option<u64>,
    /// "R" = regular season.
    pub game_type: Option<String>,
    /// ISO 8601 timestamp; only the date portion is meaningful for tracing.
    pub game_date: Option<String>,
    pub status: Option<GameStatus>,
    pub teams: Option<GameTeams>,
    /// Present when the schedule is fetched with hydrate=linescore.
    pub linescore: Option<Linescore>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GameStatus {
    /// "F" final, "I" in progress, "PW" warmup, ...
    pub status_code: Option<String>,
    /// Human-readable state, e.g. "In Progress".
    pub detailed_state: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GameTeams {
    pub home: Option<GameSide>,
    pub away: Option<GameSide>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GameSide {
    pub team: Option<SideTeam>,
    pub score: Option<u32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SideTeam {
    pub id: Option<u32>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Linescore {
    pub current_inning: Option<u32>,
    /// "Top", "Bottom", "Middle", "End".
    pub inning_state: Option<String>,
}

// ---------------------------------------------------------------------------
// Live feed  (/api/v1.1/game/{gamePk}/feed/live)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LiveFeedResponse {
    pub live_data: Option<LiveData>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LiveData {
    pub plays: Option<Plays>,
    pub linescore: Option<Linescore>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Plays {
    pub current_play: Option<CurrentPlay>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPlay {
    pub count: Option<PlayCount>,
    pub matchup: Option<Matchup>,
    pub pitch_number: Option<u32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PlayCount {
    pub balls: Option<u8>,
    pub strikes: Option<u8>,
    pub outs: Option<u8>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Matchup {
    pub batter: Option<Person>,
    pub pitcher: Option<Person>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: Option<u64>,
    pub full_name: Option<String>,
}
