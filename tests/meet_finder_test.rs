use httpmock::prelude::*;
use sdif_etl::touchpad::{FetchError, MeetFinder, MeetQuery, TouchPadClient};
use serde_json::json;
use std::time::Duration;

fn client(server: &MockServer, tries: u32) -> TouchPadClient {
    TouchPadClient::new(server.base_url(), tries, Duration::from_millis(1))
}

fn query(pattern: &str, year: i32) -> MeetQuery {
    MeetQuery {
        pattern: pattern.to_string(),
        state: "VA".to_string(),
        year,
    }
}

#[tokio::test]
async fn test_all_meets_pages_until_empty() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let first = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/meets")
                .query_param("offset", "0")
                .query_param("state", "VA")
                .query_param("year", "2023");
            then.status(200)
                .json_body(json!([{"id": 10, "name": "Stingrays vs Sharks"}, {"id": 11}]));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(GET).path("/meets").query_param("offset", "1");
            then.status(200).json_body(json!([{"id": 12, "start": "2023-06-17"}]));
        })
        .await;
    let last = server
        .mock_async(|when, then| {
            when.method(GET).path("/meets").query_param("offset", "2");
            then.status(200).json_body(json!([]));
        })
        .await;

    let meets = client(&server, 1).all_meets(&query("", 2023)).await?;

    first.assert_async().await;
    second.assert_async().await;
    last.assert_async().await;
    let ids: Vec<u64> = meets.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![10, 11, 12]);
    assert_eq!(meets[2].start_date.as_deref(), Some("2023-06-17"));
    Ok(())
}

#[tokio::test]
async fn test_null_page_ends_search() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/meets");
            then.status(200).body("null");
        })
        .await;

    let meets = client(&server, 1).all_meets(&query("Stingrays", 2023)).await?;
    assert!(meets.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_team_id_inferred_then_meets_filtered() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/meets").query_param("offset", "0");
            then.status(200)
                .json_body(json!([{"id": 1}, {"id": 2}, {"id": 3}, {"id": 4}]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/meets").query_param("offset", "1");
            then.status(200).json_body(json!([]));
        })
        .await;
    for (id, body) in [
        (1, json!([{"teamID": 77}, {"teamID": 5}])),
        (2, json!([{"teamID": 77, "name": "Stingrays"}, {"teamID": 9}])),
        (3, json!(null)),
        (4, json!([{"teamID": 9}])),
    ] {
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/meets/{}/teams", id));
                then.status(200).json_body(body);
            })
            .await;
    }

    let finder = MeetFinder::new(client(&server, 1));
    let meets = finder.fetch_meets("Stingrays", "VA", &[2023]).await?;
    assert_eq!(meets.len(), 4);

    let team_id = finder.team_id_for("Stingrays", &meets[..2]).await?;
    assert_eq!(team_id, 77);

    let kept = finder.filter_by_team_ids(meets, &[team_id]).await?;
    let ids: Vec<u64> = kept.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(kept[0].url.as_deref(), Some("http://www.touchpadlive.com/1"));
    Ok(())
}

#[tokio::test]
async fn test_no_teams_is_no_team_id() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/meets/8/teams");
            then.status(200).json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/meets").query_param("offset", "0");
            then.status(200).json_body(json!([{"id": 8}]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/meets").query_param("offset", "1");
            then.status(200).json_body(json!([]));
        })
        .await;

    let finder = MeetFinder::new(client(&server, 1));
    let meets = finder.fetch_meets("Nobody", "VA", &[2023]).await?;
    let err = finder.team_id_for("Nobody", &meets).await.unwrap_err();
    assert!(matches!(err, FetchError::NoTeamId { .. }));
    Ok(())
}

#[tokio::test]
async fn test_server_errors_are_retried_until_exhausted() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let failing = server
        .mock_async(|when, then| {
            when.method(GET).path("/meets/5/teams");
            then.status(503);
        })
        .await;

    let err = client(&server, 3).meet_teams(5).await.unwrap_err();

    assert_eq!(failing.hits_async().await, 3);
    match err {
        FetchError::RetriesExhausted {
            attempts,
            last_error,
            ..
        } => {
            assert_eq!(attempts, 3);
            assert!(last_error.contains("503"), "{last_error}");
        }
        other => panic!("unexpected error {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_client_errors_are_not_retried() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let missing = server
        .mock_async(|when, then| {
            when.method(GET).path("/meets/6/teams");
            then.status(404);
        })
        .await;

    let err = client(&server, 3).meet_teams(6).await.unwrap_err();

    assert_eq!(missing.hits_async().await, 1);
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
    Ok(())
}

#[tokio::test]
async fn test_bad_json_is_reported() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/meets/7/teams");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let err = client(&server, 2).meet_teams(7).await.unwrap_err();
    assert!(matches!(err, FetchError::Json { .. }));
    Ok(())
}
