use axum_test::TestServer;
use serde_json::json;
use tempfile::TempDir;

use streamrec::api::{create_router, AppState};
use streamrec::models::{CatalogItem, ContentType, RatingRow};
use streamrec::services::RecommendationEngine;
use streamrec::store::UserStore;

fn item(
    id: &str,
    title: &str,
    content_type: ContentType,
    genres: &[&str],
    description: &str,
) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        title: title.to_string(),
        content_type,
        director: None,
        cast: Vec::new(),
        countries: Vec::new(),
        description: description.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        release_year: Some(2020),
        duration: None,
        rating: None,
    }
}

fn row(user_id: &str, item_id: &str, rating: f32) -> RatingRow {
    RatingRow {
        user_id: user_id.to_string(),
        item_id: item_id.to_string(),
        rating,
    }
}

fn test_catalog() -> Vec<CatalogItem> {
    vec![
        item(
            "s1",
            "Kota Factory",
            ContentType::Show,
            &["Drama"],
            "students prepare for engineering entrance exams in kota",
        ),
        item(
            "s2",
            "Aspirants",
            ContentType::Show,
            &["Drama"],
            "students prepare for civil service entrance exams",
        ),
        item(
            "s3",
            "Laugh Riot",
            ContentType::Show,
            &["Comedy"],
            "sketch comedy troupe tours the country",
        ),
        item(
            "s4",
            "Vault Heist",
            ContentType::Movie,
            &["Crime"],
            "crew plans a daring vault robbery",
        ),
        item(
            "s5",
            "Casino Job",
            ContentType::Movie,
            &["Crime"],
            "crew robs a casino vault",
        ),
    ]
}

fn test_ratings() -> Vec<RatingRow> {
    vec![
        row("u1", "s1", 5.0),
        row("u2", "s1", 5.0),
        row("u2", "s4", 4.0),
        row("u2", "s3", 2.0),
    ]
}

fn create_test_server(dir: &TempDir) -> TestServer {
    let engine = RecommendationEngine::from_tables(test_catalog(), &test_ratings());
    let users = UserStore::open(dir.path()).unwrap();
    let app = create_router(AppState::new(engine, users));
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir);
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_survey_returns_requested_count() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir);

    let response = server.get("/api/survey").add_query_param("n", 4).await;
    response.assert_status_ok();
    let titles: Vec<serde_json::Value> = response.json();
    assert_eq!(titles.len(), 4);
}

#[tokio::test]
async fn test_similar_titles_excludes_seed() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir);

    let response = server
        .get("/api/title/kota%20factory/similar")
        .add_query_param("n", 1)
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let similar = body["similar"].as_array().unwrap();
    assert_eq!(similar.len(), 1);
    assert_ne!(similar[0]["id"], "s1");
}

#[tokio::test]
async fn test_similar_unknown_title_is_not_found() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir);

    let response = server.get("/api/title/unknown%20show/similar").await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("unknown show"));
}

#[tokio::test]
async fn test_recommendations_store_likes_and_return_items() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir);

    let response = server
        .post("/api/recommendations")
        .json(&json!({
            "user_id": "u9",
            "liked_titles": ["Kota Factory"],
            "n": 3
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let recommendations = body["recommendations"].as_array().unwrap();
    assert!(!recommendations.is_empty());
    assert!(recommendations
        .iter()
        .all(|item| item["title"] != "Kota Factory"));

    // The like must have landed in the stored profile.
    let response = server.get("/api/user/u9/profile").await;
    response.assert_status_ok();
    let profile: serde_json::Value = response.json();
    assert_eq!(profile["liked_titles"][0], "Kota Factory");
    assert!((profile["genre_preferences"]["Drama"].as_f64().unwrap() - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_rate_title_updates_profile() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir);

    let response = server
        .post("/api/user/u7/rate")
        .json(&json!({ "title": "Vault Heist", "rating": 5 }))
        .await;
    response.assert_status_ok();

    let response = server.get("/api/user/u7/profile").await;
    let profile: serde_json::Value = response.json();
    assert_eq!(profile["ratings"]["Vault Heist"], 5);
    assert_eq!(profile["watch_history"].as_array().unwrap().len(), 1);
    assert!((profile["genre_preferences"]["Crime"].as_f64().unwrap() - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_invalid_rating_is_rejected() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir);

    let response = server
        .post("/api/user/u7/rate")
        .json(&json!({ "title": "Vault Heist", "rating": 9 }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    // Nothing may have been stored.
    let response = server.get("/api/user/u7/profile").await;
    let profile: serde_json::Value = response.json();
    assert!(profile["ratings"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_watch_events_are_idempotent_per_title() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir);

    for _ in 0..2 {
        let response = server
            .post("/api/user/u5/watch")
            .json(&json!({ "title": "Aspirants" }))
            .await;
        response.assert_status_ok();
    }

    let response = server.get("/api/user/u5/profile").await;
    let profile: serde_json::Value = response.json();
    assert_eq!(profile["watch_history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_user_profile_is_default() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir);

    let response = server.get("/api/user/never_seen/profile").await;
    response.assert_status_ok();
    let profile: serde_json::Value = response.json();
    assert_eq!(profile["user_id"], "never_seen");
    assert!(profile["liked_titles"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_hybrid_merges_both_sources() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir);

    // u1 shares a rating with u2, so the collaborative half can
    // contribute; the content half comes from the seed title.
    let response = server
        .get("/api/user/u1/hybrid")
        .add_query_param("title", "Kota Factory")
        .add_query_param("n", 4)
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let recommendations = body["recommendations"].as_array().unwrap();
    assert!(!recommendations.is_empty());
    assert!(recommendations.iter().all(|item| item["id"] != "s1"));
}

#[tokio::test]
async fn test_evaluate_perfect_ranking() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir);

    let response = server
        .post("/api/evaluate")
        .json(&json!({
            "recommended": ["s1", "s2", "s3"],
            "relevant": ["s1", "s2", "s3"],
            "k": 3
        }))
        .await;
    response.assert_status_ok();
    let report: serde_json::Value = response.json();
    assert!((report["precision"].as_f64().unwrap() - 1.0).abs() < 1e-9);
    assert!((report["recall"].as_f64().unwrap() - 1.0).abs() < 1e-9);
    assert!((report["ndcg"].as_f64().unwrap() - 1.0).abs() < 1e-9);
    assert!((report["average_precision"].as_f64().unwrap() - 1.0).abs() < 1e-9);
}
