use crate::live::{GameCompletion, check_completion};
use crate::tracer::BandwagonTracer;
use log::{debug, error};
use mlb_api::{BandwagonResult, Team, WinRecord};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Cadence of the cosmetic team shuffle shown while a trace runs.
pub const RANDOMIZER_INTERVAL: Duration = Duration::from_millis(150);

/// Requests a presentation layer sends to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineRequest {
    LoadTeams,
    Trace { team_id: u32 },
    RefreshStreak { team_id: u32 },
    /// Issued after a [`crate::live::LiveUpdate::GameOver`]: re-check whether
    /// today's result moved the chain past the stored final team.
    CheckCompletion { team_id: u32 },
}

/// Updates the engine emits back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineUpdate {
    TeamsLoaded { teams: Vec<Team> },
    TraceComplete { result: BandwagonResult },
    /// Single opaque retry-style failure. No partial journey accompanies it.
    TraceFailed { message: String },
    StreakUpdated { team_id: u32, streak: Vec<WinRecord> },
    /// The stored final team lost after the trace: the fan has a new team.
    BandwagonChanged { new_team: Team },
}

/// Drains engine requests sequentially and answers on the update channel.
///
/// One request at a time, matching the single-active-trace assumption: a
/// trace's steps are strictly ordered (each window depends on the previous
/// loss), so there is nothing to parallelize across requests either.
pub struct EngineWorker {
    tracer: BandwagonTracer,
    requests: mpsc::Receiver<EngineRequest>,
    updates: mpsc::Sender<EngineUpdate>,
}

impl EngineWorker {
    pub fn new(
        tracer: BandwagonTracer,
        requests: mpsc::Receiver<EngineRequest>,
        updates: mpsc::Sender<EngineUpdate>,
    ) -> Self {
        Self { tracer, requests, updates }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let update = self.handle(request).await;
            debug!("engine request complete");
            if self.updates.send(update).await.is_err() {
                break;
            }
        }
    }

    async fn handle(&mut self, request: EngineRequest) -> EngineUpdate {
        match request {
            EngineRequest::LoadTeams => match self.tracer.api().fetch_teams().await {
                Ok(teams) => EngineUpdate::TeamsLoaded { teams },
                Err(e) => {
                    // Degrade to an empty list; the caller can retry later.
                    error!("team list unavailable: {e}");
                    EngineUpdate::TeamsLoaded { teams: Vec::new() }
                }
            },
            EngineRequest::Trace { team_id } => {
                debug!("tracing bandwagon from team {team_id}");
                match self.tracer.trace(team_id).await {
                    Ok(result) => EngineUpdate::TraceComplete { result },
                    Err(e) => {
                        error!("bandwagon trace failed: {e}");
                        EngineUpdate::TraceFailed {
                            message: "Sorry, there was an error finding your bandwagon team. \
                                      Please try again."
                                .into(),
                        }
                    }
                }
            }
            EngineRequest::RefreshStreak { team_id } => {
                let streak = self.tracer.current_win_streak(team_id).await;
                EngineUpdate::StreakUpdated { team_id, streak }
            }
            EngineRequest::CheckCompletion { team_id } => {
                let today = chrono::Local::now().date_naive();
                match check_completion(&mut self.tracer, team_id, today).await {
                    GameCompletion::BandwagonChanged { new_team, .. } => {
                        EngineUpdate::BandwagonChanged { new_team }
                    }
                    GameCompletion::Unchanged => {
                        // Team won or had no game: just refresh the streak.
                        let streak = self.tracer.current_win_streak(team_id).await;
                        EngineUpdate::StreakUpdated { team_id, streak }
                    }
                }
            }
        }
    }
}

/// Cosmetic shuffle shown while a trace is in flight: cycles through the
/// loaded team list on a short interval. Cancelable, one task at a time,
/// same invariant as the live poller.
#[derive(Debug, Default)]
pub struct TeamRandomizer {
    handle: Option<JoinHandle<()>>,
}

impl TeamRandomizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn start(&mut self, teams: Vec<Team>, picks: mpsc::Sender<Team>) {
        self.stop();
        if teams.is_empty() {
            return;
        }
        self.handle = Some(tokio::spawn(async move {
            let mut ticks = tokio::time::interval(RANDOMIZER_INTERVAL);
            let mut index = 0usize;
            loop {
                ticks.tick().await;
                if picks.send(teams[index % teams.len()].clone()).await.is_err() {
                    break;
                }
                index += 1;
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for TeamRandomizer {
    fn drop(&mut self) {
        self.stop();
    }
}
