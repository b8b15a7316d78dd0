use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::error::{AppError, AppResult};
use crate::models::RatingRow;

/// User-based collaborative filtering over a flat ratings table.
///
/// The dense user-by-item matrix zero-fills unrated pairs strictly for
/// similarity computation; a zero cell is never interpreted as a low rating.
#[derive(Debug, Default)]
pub struct CollaborativeModel {
    user_ids: Vec<String>,
    item_ids: Vec<String>,
    user_index: HashMap<String, usize>,
    /// User x item ratings, 0.0 where unrated
    ratings: Vec<Vec<f32>>,
    /// User x user cosine similarity
    user_similarity: Vec<Vec<f32>>,
}

impl CollaborativeModel {
    /// Builds the user-by-item matrix and the user-by-user cosine similarity
    /// matrix. Users and items are laid out in sorted-id order so output is
    /// deterministic regardless of input row order.
    ///
    /// Fails with `EmptyRatings` for a table with zero rows; callers that
    /// prefer a degraded model over an error can fall back to
    /// [`CollaborativeModel::empty`].
    pub fn fit(rows: &[RatingRow]) -> AppResult<Self> {
        if rows.is_empty() {
            return Err(AppError::EmptyRatings);
        }

        let user_ids: Vec<String> = rows
            .iter()
            .map(|row| row.user_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let item_ids: Vec<String> = rows
            .iter()
            .map(|row| row.item_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let user_index: HashMap<String, usize> = user_ids
            .iter()
            .enumerate()
            .map(|(index, id)| (id.clone(), index))
            .collect();
        let item_index: HashMap<&str, usize> = item_ids
            .iter()
            .enumerate()
            .map(|(index, id)| (id.as_str(), index))
            .collect();

        let mut ratings = vec![vec![0.0; item_ids.len()]; user_ids.len()];
        for row in rows {
            let user = user_index[&row.user_id];
            let item = item_index[row.item_id.as_str()];
            // Later rows overwrite earlier ones for the same (user, item).
            ratings[user][item] = row.rating;
        }

        let user_similarity = (0..user_ids.len())
            .map(|a| {
                (0..user_ids.len())
                    .map(|b| cosine(&ratings[a], &ratings[b]))
                    .collect()
            })
            .collect();

        Ok(Self {
            user_ids,
            item_ids,
            user_index,
            ratings,
            user_similarity,
        })
    }

    /// A model with no observed ratings; every query yields an empty list.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.user_ids.is_empty()
    }

    /// Cosine similarity between two users' rating vectors, if both exist.
    pub fn similarity(&self, user_a: &str, user_b: &str) -> Option<f32> {
        let a = *self.user_index.get(user_a)?;
        let b = *self.user_index.get(user_b)?;
        Some(self.user_similarity[a][b])
    }

    /// Top `n` item ids for `user_id`.
    ///
    /// An unknown user gets an empty list (cold start, not an error). Other
    /// users are ranked by similarity descending; each unseen item is scored
    /// by the mean of their ratings, items the target user has already rated
    /// are excluded, and score ties break on item id ascending.
    pub fn recommend(&self, user_id: &str, n: usize) -> Vec<String> {
        let Some(&user) = self.user_index.get(user_id) else {
            return Vec::new();
        };
        if n == 0 {
            return Vec::new();
        }

        let mut others: Vec<usize> = (0..self.user_ids.len()).filter(|&u| u != user).collect();
        if others.is_empty() {
            return Vec::new();
        }
        others.sort_by(|&a, &b| {
            self.user_similarity[user][b]
                .partial_cmp(&self.user_similarity[user][a])
                .unwrap_or(Ordering::Equal)
        });

        let mut scored: Vec<(usize, f32)> = Vec::new();
        for item in 0..self.item_ids.len() {
            if self.ratings[user][item] > 0.0 {
                continue;
            }
            let sum: f32 = others.iter().map(|&u| self.ratings[u][item]).sum();
            scored.push((item, sum / others.len() as f32));
        }
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| self.item_ids[a.0].cmp(&self.item_ids[b.0]))
        });
        scored.truncate(n);
        scored
            .into_iter()
            .map(|(item, _)| self.item_ids[item].clone())
            .collect()
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
