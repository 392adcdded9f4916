use crate::tracer::BandwagonTracer;
use chrono::NaiveDate;
use log::{debug, warn};
use mlb_api::client::{ApiResult, MlbApi, active_game, live_snapshot};
use mlb_api::{LiveGameSnapshot, Team};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Poll cadence while a game is underway.
pub const LIVE_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// One-shot view of the live-game surface for a team.
pub struct LiveGameObserver {
    api: MlbApi,
}

impl LiveGameObserver {
    pub fn new(api: MlbApi) -> Self {
        Self { api }
    }

    /// Snapshot of the team's in-progress game today, or `None` when nothing
    /// is underway ("not started" and "final" both count as no game).
    ///
    /// The play-by-play feed is best-effort: if it errors the snapshot still
    /// carries the score and inning from the schedule entry.
    pub async fn poll_once(
        &self,
        team_id: u32,
        today: NaiveDate,
    ) -> ApiResult<Option<LiveGameSnapshot>> {
        let raw = self.api.fetch_schedule_for_date(team_id, today).await?;
        let Some(game) = active_game(&raw) else {
            return Ok(None);
        };
        let details = match game.game_pk {
            Some(pk) => match self.api.fetch_live_details(pk).await {
                Ok(details) => Some(details),
                Err(e) => {
                    debug!("live feed unavailable for game {pk}: {e}");
                    None
                }
            },
            None => None,
        };
        Ok(live_snapshot(game, details))
    }
}

/// Outcome of re-checking the chain's tail after a watched game completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCompletion {
    /// The final team lost today: the stored journey's tail is stale. This is
    /// surfaced as a notification; the stored result is never patched.
    BandwagonChanged {
        new_team: Team,
        date: NaiveDate,
        score: String,
    },
    /// The team won, or had no completed game today.
    Unchanged,
}

/// Re-read today's completed games for the (former) final team and report
/// whether the chain moved on. Drops the cached today-window first — it was
/// fetched before the game ended and no longer reflects the result.
pub async fn check_completion(
    tracer: &mut BandwagonTracer,
    team_id: u32,
    today: NaiveDate,
) -> GameCompletion {
    tracer.schedules.invalidate(team_id, today, today);
    match tracer.find_next_loss(team_id, today, today).await {
        Some(loss) => {
            let api = tracer.api().clone();
            let new_team = tracer.teams.team(&api, loss.opponent_id).await;
            GameCompletion::BandwagonChanged { new_team, date: loss.date, score: loss.score }
        }
        None => GameCompletion::Unchanged,
    }
}

/// Messages emitted by [`LivePoller`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveUpdate {
    /// A materially different snapshot (score, status, or inning moved).
    Snapshot(LiveGameSnapshot),
    /// The watched game stopped appearing as active. The poller stops itself;
    /// the owner should run [`check_completion`] next.
    GameOver,
}

/// Cancelable periodic poll of the final team's in-progress game.
///
/// At most one poll task is ever active: `start` cancels any previous task
/// before spawning, so repeated starts are safe. A failed tick is logged and
/// skipped; polling continues on the next interval.
#[derive(Debug, Default)]
pub struct LivePoller {
    handle: Option<JoinHandle<()>>,
}

impl LivePoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn start(&mut self, api: MlbApi, team_id: u32, updates: mpsc::Sender<LiveUpdate>) {
        self.stop();
        let observer = LiveGameObserver::new(api);
        self.handle = Some(tokio::spawn(async move {
            let mut last: Option<LiveGameSnapshot> = None;
            let mut ticks = tokio::time::interval(LIVE_POLL_INTERVAL);
            // Skip the immediate first tick; the caller just rendered a fresh
            // snapshot when it decided to start polling.
            ticks.tick().await;
            loop {
                ticks.tick().await;
                let today = chrono::Local::now().date_naive();
                match observer.poll_once(team_id, today).await {
                    Ok(Some(snapshot)) => {
                        let changed = last.as_ref().is_none_or(|prev| snapshot.differs_from(prev));
                        if changed
                            && updates.send(LiveUpdate::Snapshot(snapshot.clone())).await.is_err()
                        {
                            break;
                        }
                        last = Some(snapshot);
                    }
                    Ok(None) => {
                        let _ = updates.send(LiveUpdate::GameOver).await;
                        break;
                    }
                    Err(e) => {
                        warn!("live poll tick failed for team {team_id}: {e}");
                    }
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for LivePoller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{date, final_game, mock_schedule, mock_team, schedule_body};
    use crate::tracer::SeasonWindow;
    use mockito::Matcher;
    use serde_json::json;

    async fn live_schedule_mock(
        server: &mut mockito::ServerGuard,
        team_id: u32,
        day: &str,
        body: String,
    ) -> mockito::Mock {
        server
            .mock("GET", "/api/v1/schedule/games/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("teamId".into(), team_id.to_string()),
                Matcher::UrlEncoded("date".into(), day.into()),
            ]))
            .with_body(body)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn poll_once_returns_none_without_an_active_game() {
        let mut server = mockito::Server::new_async().await;
        // Today's entry is already final.
        let body = schedule_body(&[final_game(745060, "2024-06-01", (121, 4), (143, 2))]);
        let _mock = live_schedule_mock(&mut server, 121, "2024-06-01", body).await;

        let observer = LiveGameObserver::new(MlbApi::with_base_url(server.url()));
        let snap = observer.poll_once(121, date("2024-06-01")).await.expect("poll");
        assert!(snap.is_none());
    }

    #[tokio::test]
    async fn poll_once_snapshots_an_in_progress_game() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "dates": [{
                "games": [{
                    "gamePk": 745061,
                    "gameType": "R",
                    "gameDate": "2024-06-01T23:10:00Z",
                    "status": {"statusCode": "I", "detailedState": "In Progress"},
                    "teams": {
                        "home": {"team": {"id": 121, "name": "New York Mets"}, "score": 3},
                        "away": {"team": {"id": 143, "name": "Philadelphia Phillies"}, "score": 2}
                    },
                    "linescore": {"currentInning": 6, "inningState": "Top"}
                }]
            }]
        })
        .to_string();
        let _schedule = live_schedule_mock(&mut server, 121, "2024-06-01", body).await;
        let feed = json!({
            "liveData": {
                "plays": {"currentPlay": {"count": {"balls": 1, "strikes": 2, "outs": 0}}}
            }
        });
        let _feed = server
            .mock("GET", "/api/v1.1/game/745061/feed/live")
            .with_body(feed.to_string())
            .create_async()
            .await;

        let observer = LiveGameObserver::new(MlbApi::with_base_url(server.url()));
        let snap = observer
            .poll_once(121, date("2024-06-01"))
            .await
            .expect("poll")
            .expect("active game");
        assert_eq!(snap.game_pk, 745061);
        assert_eq!(snap.status, "In Progress");
        assert_eq!(snap.home.score, 3);
        assert_eq!(snap.inning, Some(6));
        assert_eq!(snap.details.as_ref().map(|d| d.strikes), Some(2));
    }

    #[tokio::test]
    async fn feed_outage_still_yields_a_score_only_snapshot() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "dates": [{
                "games": [{
                    "gamePk": 745062,
                    "gameDate": "2024-06-01T23:10:00Z",
                    "status": {"statusCode": "I", "detailedState": "In Progress"},
                    "teams": {
                        "home": {"team": {"id": 121, "name": "New York Mets"}, "score": 1},
                        "away": {"team": {"id": 143, "name": "Philadelphia Phillies"}, "score": 0}
                    }
                }]
            }]
        })
        .to_string();
        let _schedule = live_schedule_mock(&mut server, 121, "2024-06-01", body).await;
        let _feed = server
            .mock("GET", "/api/v1.1/game/745062/feed/live")
            .with_status(500)
            .create_async()
            .await;

        let observer = LiveGameObserver::new(MlbApi::with_base_url(server.url()));
        let snap = observer
            .poll_once(121, date("2024-06-01"))
            .await
            .expect("poll")
            .expect("active game");
        assert!(snap.details.is_none());
        assert_eq!(snap.home.score, 1);
    }

    #[tokio::test]
    async fn completion_with_a_new_loss_reports_the_bandwagon_change() {
        let mut server = mockito::Server::new_async().await;
        let _today = mock_schedule(
            &mut server,
            121,
            "2024-06-01",
            "2024-06-01",
            schedule_body(&[final_game(745063, "2024-06-01", (143, 6), (121, 2))]),
        )
        .await;
        let _t143 = mock_team(&mut server, 143, "Philadelphia Phillies").await;

        let window = SeasonWindow { start: date("2024-03-01"), end: date("2024-06-01") };
        let mut tracer = BandwagonTracer::new(MlbApi::with_base_url(server.url()), window);
        let completion = check_completion(&mut tracer, 121, date("2024-06-01")).await;

        match completion {
            GameCompletion::BandwagonChanged { new_team, date: day, score } => {
                assert_eq!(new_team.id, 143);
                assert_eq!(new_team.name, "Philadelphia Phillies");
                assert_eq!(day, date("2024-06-01"));
                assert_eq!(score, "2-6");
            }
            GameCompletion::Unchanged => panic!("loss should surface a change"),
        }
    }

    #[tokio::test]
    async fn completion_after_a_win_is_unchanged_and_bypasses_the_stale_cache() {
        let mut server = mockito::Server::new_async().await;
        let today_mock = server
            .mock("GET", "/api/v1/schedule/games/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("teamId".into(), "121".into()),
                Matcher::UrlEncoded("startDate".into(), "2024-06-01".into()),
                Matcher::UrlEncoded("endDate".into(), "2024-06-01".into()),
            ]))
            .with_body(schedule_body(&[final_game(745064, "2024-06-01", (121, 4), (143, 2))]))
            .expect(2)
            .create_async()
            .await;

        let window = SeasonWindow { start: date("2024-03-01"), end: date("2024-06-01") };
        let mut tracer = BandwagonTracer::new(MlbApi::with_base_url(server.url()), window);

        // Prime the today-window cache, then verify completion re-fetches it.
        let _ = tracer.find_next_loss(121, date("2024-06-01"), date("2024-06-01")).await;
        let completion = check_completion(&mut tracer, 121, date("2024-06-01")).await;
        assert_eq!(completion, GameCompletion::Unchanged);
        today_mock.assert_async().await;
    }

    #[tokio::test]
    async fn starting_the_poller_twice_keeps_a_single_active_task() {
        let server = mockito::Server::new_async().await;
        let (tx, _rx) = mpsc::channel(8);

        let mut poller = LivePoller::new();
        poller.start(MlbApi::with_base_url(server.url()), 121, tx.clone());
        let first = poller.handle.as_ref().expect("first task").abort_handle();
        assert!(poller.is_active());

        poller.start(MlbApi::with_base_url(server.url()), 121, tx);
        assert!(poller.is_active());
        // The first task was cancelled by the restart.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(first.is_finished());

        poller.stop();
        assert!(!poller.is_active());
    }
}
