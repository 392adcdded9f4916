use crate::tracer::BandwagonTracer;
use mlb_api::WinRecord;

impl BandwagonTracer {
    /// Contiguous run of wins ending at the team's most recent completed
    /// game, returned oldest first. A team coming off a loss has an empty
    /// streak; that is a normal answer, not an error.
    pub async fn current_win_streak(&mut self, team_id: u32) -> Vec<WinRecord> {
        let window = self.window();
        let games = self
            .schedules
            .outcomes(&self.api, team_id, window.start, window.end)
            .await;

        let mut streak: Vec<WinRecord> = Vec::new();
        for game in games.iter().rev() {
            if !game.team_won {
                break;
            }
            let opponent = self.teams.team(&self.api, game.opponent_id).await;
            streak.push(WinRecord {
                opponent,
                date: game.date,
                score: game.score.clone(),
                is_home: game.is_home,
                game_pk: game.game_pk,
            });
        }
        streak.reverse();
        streak
    }
}
