pub mod client;
pub mod statsapi;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Recognized tunables
// ---------------------------------------------------------------------------

/// MLB is sport 1 in the Stats API.
pub const SPORT_ID: u32 = 1;
/// American League and National League.
pub const LEAGUE_IDS: [u32; 2] = [103, 104];
/// Status code of a completed game.
pub const COMPLETED_STATUS: &str = "F";
/// Game type code of a regular-season game.
pub const REGULAR_SEASON: &str = "R";
/// Status codes counted as "underway": in progress, warmup, inning review,
/// manager challenge, and the delay states.
pub const IN_PROGRESS_STATUSES: [&str; 6] = ["I", "PW", "IR", "MA", "DR", "DI"];

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the statsapi wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Team {
    pub id: u32,
    pub name: String,
}

impl Team {
    /// Sentinel identity used when metadata resolution fails. Carries the real
    /// id so callers can keep displaying it; never a reason to abort a trace.
    pub fn unknown(id: u32) -> Self {
        Self { id, name: "Unknown Team".into() }
    }
}

/// One completed regular-season game seen from a single team's perspective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    pub opponent_id: u32,
    pub date: NaiveDate,
    pub team_won: bool,
    /// Formatted "<own>-<opponent>" — the team's own runs always print first.
    pub score: String,
    pub is_home: bool,
    pub game_pk: u64,
}

/// A win accrued by the active team before its next loss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinRecord {
    pub opponent: Team,
    pub date: NaiveDate,
    pub score: String,
    pub is_home: bool,
    pub game_pk: u64,
}

/// One loss handoff in the chain: the current team went down, the winner
/// takes over. `wins` holds the losing team's tenure wins, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyStep {
    pub losing_team: Team,
    pub winning_team: Team,
    pub date: NaiveDate,
    pub score: String,
    pub game_pk: u64,
    pub wins: Vec<WinRecord>,
}

/// Complete output of one trace.
///
/// Invariant: `journey[i].winning_team.id == journey[i + 1].losing_team.id`,
/// and `final_team` is the last step's winner (or the starting team when the
/// journey is empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandwagonResult {
    pub journey: Vec<JourneyStep>,
    pub final_team: Team,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveTeamLine {
    pub id: u32,
    pub name: String,
    pub score: u32,
}

/// Current-play detail pulled from the live feed. Best-effort: a feed outage
/// leaves the snapshot without it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveDetails {
    pub balls: u8,
    pub strikes: u8,
    pub outs: u8,
    pub batter: Option<String>,
    pub pitcher: Option<String>,
    pub pitch_count: u32,
}

/// Point-in-time view of an in-progress game. Re-fetched on every poll tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveGameSnapshot {
    pub game_pk: u64,
    pub status: String,
    pub home: LiveTeamLine,
    pub away: LiveTeamLine,
    pub inning: Option<u32>,
    pub inning_state: Option<String>,
    pub details: Option<LiveDetails>,
}

impl LiveGameSnapshot {
    /// Material change detection: score, status, inning, or inning state
    /// moved. Ball/strike deltas alone don't force a structural update; they
    /// only feed the displayed count.
    pub fn differs_from(&self, other: &Self) -> bool {
        self.home.score != other.home.score
            || self.away.score != other.away.score
            || self.status != other.status
            || self.inning != other.inning
            || self.inning_state != other.inning_state
    }
}
