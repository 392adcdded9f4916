//! Shared builders for mock Stats API payloads used across the engine tests.

use chrono::NaiveDate;
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{Value, json};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date")
}

/// A completed regular-season schedule entry.
pub fn final_game(pk: u64, day: &str, home: (u32, u32), away: (u32, u32)) -> Value {
    json!({
        "gamePk": pk,
        "gameType": "R",
        "gameDate": format!("{day}T23:05:00Z"),
        "status": {"statusCode": "F", "detailedState": "Final"},
        "teams": {
            "home": {"team": {"id": home.0}, "score": home.1},
            "away": {"team": {"id": away.0}, "score": away.1}
        }
    })
}

pub fn schedule_body(games: &[Value]) -> String {
    json!({"dates": [{"games": games}]}).to_string()
}

pub async fn mock_schedule(
    server: &mut ServerGuard,
    team_id: u32,
    start: &str,
    end: &str,
    body: String,
) -> Mock {
    server
        .mock("GET", "/api/v1/schedule/games/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("teamId".into(), team_id.to_string()),
            Matcher::UrlEncoded("startDate".into(), start.into()),
            Matcher::UrlEncoded("endDate".into(), end.into()),
            Matcher::UrlEncoded("gameType".into(), "R".into()),
        ]))
        .with_body(body)
        .create_async()
        .await
}

pub async fn mock_team(server: &mut ServerGuard, id: u32, name: &str) -> Mock {
    server
        .mock("GET", format!("/api/v1/teams/{id}").as_str())
        .with_body(json!({"teams": [{"id": id, "name": name}]}).to_string())
        .create_async()
        .await
}
