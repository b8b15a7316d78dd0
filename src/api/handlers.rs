use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::{RecommendationItem, UserProfile};
use crate::services::evaluation::{self, EvaluationReport};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SurveyParams {
    #[serde(default = "default_survey_size")]
    pub n: usize,
}

fn default_survey_size() -> usize {
    50
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsRequest {
    pub user_id: String,
    #[serde(default)]
    pub liked_titles: Vec<String>,
    #[serde(default = "default_recommendation_count")]
    pub n: usize,
}

fn default_recommendation_count() -> usize {
    10
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<RecommendationItem>,
}

#[derive(Debug, Deserialize)]
pub struct SimilarParams {
    #[serde(default = "default_similar_count")]
    pub n: usize,
}

fn default_similar_count() -> usize {
    5
}

#[derive(Debug, Serialize)]
pub struct SimilarResponse {
    pub title: String,
    pub similar: Vec<RecommendationItem>,
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub title: String,
    pub rating: i64,
}

#[derive(Debug, Deserialize)]
pub struct WatchRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct HybridParams {
    /// Seed title for the content half
    pub title: String,
    #[serde(default = "default_recommendation_count")]
    pub n: usize,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub recommended: Vec<String>,
    pub relevant: Vec<String>,
    #[serde(default = "default_eval_k")]
    pub k: usize,
}

fn default_eval_k() -> usize {
    5
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Diverse catalog sample for the first-visit survey
pub async fn survey(
    State(state): State<AppState>,
    Query(params): Query<SurveyParams>,
) -> Json<Vec<RecommendationItem>> {
    Json(state.engine.diverse_titles(params.n))
}

/// Stores liked titles and returns personalized recommendations
pub async fn recommendations(
    State(state): State<AppState>,
    Json(request): Json<RecommendationsRequest>,
) -> AppResult<Json<RecommendationsResponse>> {
    let profile = if request.liked_titles.is_empty() {
        state.users.get_profile(&request.user_id).await?
    } else {
        state
            .users
            .add_liked_titles(
                &request.user_id,
                &request.liked_titles,
                state.engine.title_genres(),
            )
            .await?
    };
    let recommendations = state.engine.recommend_for_user(&profile, request.n);
    Ok(Json(RecommendationsResponse { recommendations }))
}

/// Content similar to a specific title
pub async fn similar_titles(
    State(state): State<AppState>,
    Path(title): Path<String>,
    Query(params): Query<SimilarParams>,
) -> AppResult<Json<SimilarResponse>> {
    let similar = state.engine.recommend_similar(&title, params.n)?;
    Ok(Json(SimilarResponse { title, similar }))
}

/// Fetches a user's profile, creating a default one for unknown users
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserProfile>> {
    let profile = state.users.get_profile(&user_id).await?;
    Ok(Json(profile))
}

/// Stores a rating and returns recommendations refreshed from the updated
/// profile
pub async fn rate_title(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<RateRequest>,
) -> AppResult<Json<RecommendationsResponse>> {
    let profile = state
        .users
        .add_rating(
            &user_id,
            &request.title,
            request.rating,
            state.engine.title_genres(),
        )
        .await?;
    let recommendations = state
        .engine
        .recommend_for_user(&profile, default_similar_count());
    Ok(Json(RecommendationsResponse { recommendations }))
}

/// Appends a watch event; re-watching an already recorded title is a no-op
pub async fn add_watch(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<WatchRequest>,
) -> AppResult<Json<UserProfile>> {
    let profile = state.users.add_watch_event(&user_id, &request.title).await?;
    Ok(Json(profile))
}

/// Merged content + collaborative recommendations for a user and seed title
pub async fn hybrid(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<HybridParams>,
) -> AppResult<Json<RecommendationsResponse>> {
    let recommendations = state
        .engine
        .recommend_hybrid(&user_id, &params.title, params.n)?;
    Ok(Json(RecommendationsResponse { recommendations }))
}

/// Offline ranking metrics for one recommendation list
pub async fn evaluate(Json(request): Json<EvaluateRequest>) -> Json<EvaluationReport> {
    Json(evaluation::evaluate(
        &request.recommended,
        &request.relevant,
        request.k,
    ))
}
