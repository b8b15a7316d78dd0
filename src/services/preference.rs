//! Genre-preference aggregation and preference-based re-ranking.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{RecommendationItem, TitleGenres};

/// Weight carried by each genre occurrence of a liked title
const LIKE_WEIGHT: f64 = 1.0;
/// A rated title contributes `rating / RATING_SCALE` per genre occurrence
const RATING_SCALE: f64 = 5.0;

/// Derives normalized genre weights from liked titles and ratings.
///
/// Weights are normalized to sum to 1 across all genres; titles without a
/// catalog genre entry contribute nothing, and no signal at all yields an
/// empty map rather than a division by zero.
pub fn genre_preferences(
    liked_titles: &BTreeSet<String>,
    ratings: &BTreeMap<String, u8>,
    title_genres: &TitleGenres,
) -> BTreeMap<String, f64> {
    let mut weights: BTreeMap<String, f64> = BTreeMap::new();

    for title in liked_titles {
        if let Some(genres) = title_genres.get(&title.to_lowercase()) {
            for genre in genres {
                *weights.entry(genre.clone()).or_insert(0.0) += LIKE_WEIGHT;
            }
        }
    }
    for (title, rating) in ratings {
        if let Some(genres) = title_genres.get(&title.to_lowercase()) {
            for genre in genres {
                *weights.entry(genre.clone()).or_insert(0.0) +=
                    f64::from(*rating) / RATING_SCALE;
            }
        }
    }

    let total: f64 = weights.values().sum();
    if total > 0.0 {
        for weight in weights.values_mut() {
            *weight /= total;
        }
    }
    weights
}

/// Mean preference weight over a candidate's genres; 0 when it has none.
pub fn genre_score(genres: &[String], preferences: &BTreeMap<String, f64>) -> f64 {
    if genres.is_empty() {
        return 0.0;
    }
    let sum: f64 = genres
        .iter()
        .map(|genre| preferences.get(genre).copied().unwrap_or(0.0))
        .sum();
    sum / genres.len() as f64
}

/// Reorders candidates by genre preference, best first.
///
/// Leaves the upstream order untouched when the profile has no preferences;
/// the sort is stable, so equally scored candidates also keep their upstream
/// order.
pub fn rerank_by_preference(
    candidates: &mut Vec<RecommendationItem>,
    preferences: &BTreeMap<String, f64>,
) {
    if preferences.is_empty() {
        return;
    }
    let mut scored: Vec<(f64, RecommendationItem)> = candidates
        .drain(..)
        .map(|candidate| (genre_score(&candidate.genres, preferences), candidate))
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    candidates.extend(scored.into_iter().map(|(_, candidate)| candidate));
}
