//! Integration tests for session endpoints
//!
//! Covers the full session lifecycle: composition, duration persistence,
//! sharing, rating aggregation and favorites.

mod common;

use axum::http::StatusCode;
use serde_json::json;

/// Fetch some seeded catalog exercise ids
async fn catalog_ids(app: &common::TestApp, token: &str, count: usize) -> Vec<String> {
    let (status, body) = app.get_auth("/api/v1/exercises", token).await;
    assert_eq!(status, StatusCode::OK);

    let exercises: serde_json::Value = serde_json::from_str(&body).unwrap();
    exercises
        .as_array()
        .unwrap()
        .iter()
        .take(count)
        .map(|e| e["id"].as_str().unwrap().to_string())
        .collect()
}

/// Create a session with the given durations and rest time
async fn create_session(
    app: &common::TestApp,
    token: &str,
    durations: &[u32],
    rest_time_secs: u32,
) -> serde_json::Value {
    let ids = catalog_ids(app, token, durations.len()).await;
    let exercises: Vec<serde_json::Value> = ids
        .iter()
        .zip(durations)
        .map(|(id, duration)| json!({ "exercise_id": id, "duration_secs": duration }))
        .collect();

    let body = json!({
        "name": "Test session",
        "category": "musculation",
        "difficulty": "moyen",
        "rest_time_secs": rest_time_secs,
        "exercises": exercises
    });

    let (status, response) = app
        .post_auth("/api/v1/sessions", &body.to_string(), token)
        .await;
    assert_eq!(status, StatusCode::OK, "create failed: {}", response);

    serde_json::from_str(&response).unwrap()
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_session_computes_duration() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let session = create_session(&app, &user.tokens.access_token, &[30, 45, 20], 10).await;

    // 30 + 45 + 20 + 2 * 10 = 115
    assert_eq!(session["duration_secs"], 115);
    assert_eq!(session["exercise_count"], 3);
    assert_eq!(session["rating"], 0.0);
    assert_eq!(session["rating_count"], 0);
    assert_eq!(session["is_shared"], false);

    // Entries come back ordered 1..N
    let orders: Vec<u64> = session["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["order"].as_u64().unwrap())
        .collect();
    assert_eq!(orders, vec![1, 2, 3]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_session_single_exercise_no_rest() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let session = create_session(&app, &user.tokens.access_token, &[40], 15).await;

    assert_eq!(session["duration_secs"], 40);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_session_rejects_invalid_rest_time() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;
    let ids = catalog_ids(&app, &user.tokens.access_token, 1).await;

    let body = json!({
        "name": "Bad rest",
        "category": "yoga",
        "difficulty": "facile",
        "rest_time_secs": 7,
        "exercises": [{ "exercise_id": ids[0] }]
    });

    let (status, response) = app
        .post_auth("/api/v1/sessions", &body.to_string(), &user.tokens.access_token)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["error"]["field"], "rest_time_secs");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_session_rejects_empty_exercises() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({
        "name": "Empty",
        "category": "yoga",
        "difficulty": "facile",
        "rest_time_secs": 10,
        "exercises": []
    });

    let (status, _) = app
        .post_auth("/api/v1/sessions", &body.to_string(), &user.tokens.access_token)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_session_rejects_duplicate_exercise() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;
    let ids = catalog_ids(&app, &user.tokens.access_token, 1).await;

    let body = json!({
        "name": "Dup",
        "category": "mixte",
        "difficulty": "difficile",
        "rest_time_secs": 10,
        "exercises": [
            { "exercise_id": ids[0] },
            { "exercise_id": ids[0] }
        ]
    });

    let (status, _) = app
        .post_auth("/api/v1/sessions", &body.to_string(), &user.tokens.access_token)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_session_rejects_unknown_exercise() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({
        "name": "Ghost",
        "category": "yoga",
        "difficulty": "facile",
        "rest_time_secs": 10,
        "exercises": [{ "exercise_id": uuid::Uuid::new_v4() }]
    });

    let (status, _) = app
        .post_auth("/api/v1/sessions", &body.to_string(), &user.tokens.access_token)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_update_rest_time_recomputes_duration() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let session = create_session(&app, &user.tokens.access_token, &[30, 45, 20], 10).await;
    let id = session["id"].as_str().unwrap();

    let body = json!({ "rest_time_secs": 20 });
    let (status, response) = app
        .put_auth(
            &format!("/api/v1/sessions/{}", id),
            &body.to_string(),
            &user.tokens.access_token,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let updated: serde_json::Value = serde_json::from_str(&response).unwrap();
    // 30 + 45 + 20 + 2 * 20 = 135
    assert_eq!(updated["duration_secs"], 135);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_update_exercises_recomputes_duration_and_renumbers() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let session = create_session(&app, &user.tokens.access_token, &[30, 45, 20], 10).await;
    let id = session["id"].as_str().unwrap();

    // Keep only the first two exercises, with new durations
    let entries = session["entries"].as_array().unwrap();
    let body = json!({
        "exercises": [
            { "exercise_id": entries[0]["exercise_id"], "duration_secs": 60 },
            { "exercise_id": entries[1]["exercise_id"], "duration_secs": 25 }
        ]
    });

    let (status, response) = app
        .put_auth(
            &format!("/api/v1/sessions/{}", id),
            &body.to_string(),
            &user.tokens.access_token,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let updated: serde_json::Value = serde_json::from_str(&response).unwrap();
    // 60 + 25 + 1 * 10 = 95
    assert_eq!(updated["duration_secs"], 95);

    let orders: Vec<u64> = updated["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["order"].as_u64().unwrap())
        .collect();
    assert_eq!(orders, vec![1, 2]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_non_owner_cannot_update_or_delete() {
    let app = common::TestApp::new().await;
    let owner = app.create_test_user().await;
    let stranger = app.create_test_user().await;

    let session = create_session(&app, &owner.tokens.access_token, &[30], 10).await;
    let id = session["id"].as_str().unwrap();

    let body = json!({ "name": "Hijacked" });
    let (status, _) = app
        .put_auth(
            &format!("/api/v1/sessions/{}", id),
            &body.to_string(),
            &stranger.tokens.access_token,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .delete_auth(&format!("/api/v1/sessions/{}", id), &stranger.tokens.access_token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_share_toggle_and_community_visibility() {
    let app = common::TestApp::new().await;
    let owner = app.create_test_user().await;
    let stranger = app.create_test_user().await;

    let session = create_session(&app, &owner.tokens.access_token, &[30, 45], 10).await;
    let id = session["id"].as_str().unwrap();

    // Private: not visible to others
    let (status, _) = app
        .get_auth(&format!("/api/v1/sessions/{}", id), &stranger.tokens.access_token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Owner shares it
    let (status, response) = app
        .post_auth(&format!("/api/v1/sessions/{}/share", id), "{}", &owner.tokens.access_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let share: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(share["is_shared"], true);

    // Now visible to others and listed in the community feed
    let (status, _) = app
        .get_auth(&format!("/api/v1/sessions/{}", id), &stranger.tokens.access_token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .get_auth("/api/v1/sessions/shared", &stranger.tokens.access_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(id));

    // Toggling again unshares
    let (_, response) = app
        .post_auth(&format!("/api/v1/sessions/{}/share", id), "{}", &owner.tokens.access_token)
        .await;
    let share: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(share["is_shared"], false);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_rating_upsert_recomputes_mean() {
    let app = common::TestApp::new().await;
    let owner = app.create_test_user().await;
    let rater = app.create_test_user().await;

    let session = create_session(&app, &owner.tokens.access_token, &[30], 10).await;
    let id = session["id"].as_str().unwrap();

    // Share so the second user can rate it
    app.post_auth(&format!("/api/v1/sessions/{}/share", id), "{}", &owner.tokens.access_token)
        .await;

    // Owner rates 5, rater rates 4 -> mean 4.5, count 2
    let (status, _) = app
        .post_auth(
            &format!("/api/v1/sessions/{}/ratings", id),
            &json!({ "rating": 5 }).to_string(),
            &owner.tokens.access_token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, response) = app
        .post_auth(
            &format!("/api/v1/sessions/{}/ratings", id),
            &json!({ "rating": 4 }).to_string(),
            &rater.tokens.access_token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let summary: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(summary["rating"], 4.5);
    assert_eq!(summary["rating_count"], 2);

    // Re-rating upserts instead of adding a row: mean moves, count doesn't
    let (_, response) = app
        .post_auth(
            &format!("/api/v1/sessions/{}/ratings", id),
            &json!({ "rating": 2 }).to_string(),
            &rater.tokens.access_token,
        )
        .await;
    let summary: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(summary["rating"], 3.5);
    assert_eq!(summary["rating_count"], 2);

    // Aggregate is persisted on the session itself
    let (_, body) = app
        .get_auth(&format!("/api/v1/sessions/{}", id), &owner.tokens.access_token)
        .await;
    let fetched: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(fetched["rating"], 3.5);
    assert_eq!(fetched["rating_count"], 2);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_rating_bounds_and_visibility() {
    let app = common::TestApp::new().await;
    let owner = app.create_test_user().await;
    let stranger = app.create_test_user().await;

    let session = create_session(&app, &owner.tokens.access_token, &[30], 10).await;
    let id = session["id"].as_str().unwrap();

    // Out-of-range rating
    let (status, _) = app
        .post_auth(
            &format!("/api/v1/sessions/{}/ratings", id),
            &json!({ "rating": 6 }).to_string(),
            &owner.tokens.access_token,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unshared session cannot be rated by a stranger
    let (status, _) = app
        .post_auth(
            &format!("/api/v1/sessions/{}/ratings", id),
            &json!({ "rating": 4 }).to_string(),
            &stranger.tokens.access_token,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_favorites_roundtrip() {
    let app = common::TestApp::new().await;
    let owner = app.create_test_user().await;
    let fan = app.create_test_user().await;

    let session = create_session(&app, &owner.tokens.access_token, &[30, 45], 10).await;
    let id = session["id"].as_str().unwrap();
    app.post_auth(&format!("/api/v1/sessions/{}/share", id), "{}", &owner.tokens.access_token)
        .await;

    // Favorite it (idempotent)
    for _ in 0..2 {
        let (status, response) = app
            .put_auth(&format!("/api/v1/favorites/{}", id), "{}", &fan.tokens.access_token)
            .await;
        assert_eq!(status, StatusCode::OK);
        let favorite: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(favorite["is_favorite"], true);
    }

    let (status, body) = app.get_auth("/api/v1/favorites", &fan.tokens.access_token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(id));

    // Unfavorite
    let (status, _) = app
        .delete_auth(&format!("/api/v1/favorites/{}", id), &fan.tokens.access_token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get_auth("/api/v1/favorites", &fan.tokens.access_token).await;
    assert!(!body.contains(id));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_playback_payload() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let session = create_session(&app, &user.tokens.access_token, &[20, 30], 10).await;
    let id = session["id"].as_str().unwrap();

    let (status, response) = app
        .get_auth(&format!("/api/v1/sessions/{}/playback", id), &user.tokens.access_token)
        .await;

    assert_eq!(status, StatusCode::OK);
    let playback: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(playback["countdown_secs"], 5);
    assert_eq!(playback["rest_time_secs"], 10);

    let entries = playback["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["order"], 1);
    assert_eq!(entries[0]["duration_secs"], 20);
    assert_eq!(entries[1]["order"], 2);
    assert_eq!(entries[1]["duration_secs"], 30);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_preview_matches_persisted_duration() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let (status, response) = app
        .post_auth(
            "/api/v1/sessions/preview",
            &json!({ "durations": [30, 45, 20], "rest_time_secs": 10 }).to_string(),
            &user.tokens.access_token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let preview: serde_json::Value = serde_json::from_str(&response).unwrap();

    let session = create_session(&app, &user.tokens.access_token, &[30, 45, 20], 10).await;

    assert_eq!(preview["duration_secs"], session["duration_secs"]);
}
