use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::thread_rng;
use tracing::warn;

use crate::error::AppResult;
use crate::models::{
    CatalogItem, CatalogSnapshot, ContentType, RatingRow, RecommendationItem, TitleGenres,
    UserProfile,
};

use super::collaborative::CollaborativeModel;
use super::content::ContentRecommender;
use super::hybrid::HybridRecommender;
use super::preference;

/// Content neighbors pooled per liked title when building personalized
/// recommendations
const NEIGHBORS_PER_LIKED_TITLE: usize = 3;

/// Central entry point combining the content, collaborative and
/// genre-preference signals over one catalog snapshot.
pub struct RecommendationEngine {
    snapshot: Arc<CatalogSnapshot>,
    content: ContentRecommender,
    collaborative: CollaborativeModel,
}

impl RecommendationEngine {
    /// Builds the engine from the cleaned catalog and ratings tables.
    ///
    /// An empty table degrades the corresponding model to one that answers
    /// every query with an empty list; the condition is logged, not fatal.
    pub fn from_tables(items: Vec<CatalogItem>, ratings: &[RatingRow]) -> Self {
        let snapshot = Arc::new(CatalogSnapshot::new(items));
        let content = match ContentRecommender::fit(Arc::clone(&snapshot)) {
            Ok(model) => model,
            Err(err) => {
                warn!("content model degraded to empty: {err}");
                ContentRecommender::empty()
            }
        };
        let collaborative = match CollaborativeModel::fit(ratings) {
            Ok(model) => model,
            Err(err) => {
                warn!("collaborative model degraded to empty: {err}");
                CollaborativeModel::empty()
            }
        };
        Self {
            snapshot,
            content,
            collaborative,
        }
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    /// Lowercased title -> genres mapping for profile-store updates.
    pub fn title_genres(&self) -> &TitleGenres {
        self.snapshot.title_genres()
    }

    /// Content similar to a seed title.
    pub fn recommend_similar(&self, title: &str, n: usize) -> AppResult<Vec<RecommendationItem>> {
        self.content.recommend(title, n)
    }

    /// Merged content + collaborative list for a user and seed title.
    pub fn recommend_hybrid(
        &self,
        user_id: &str,
        seed_title: &str,
        n: usize,
    ) -> AppResult<Vec<RecommendationItem>> {
        HybridRecommender::new(&self.content, &self.collaborative, &self.snapshot)
            .recommend(user_id, seed_title, n)
    }

    /// Personalized recommendations from a user's profile.
    ///
    /// Pools content neighbors of every liked title, drops duplicates and the
    /// liked titles themselves, re-ranks by the profile's genre preferences
    /// and returns the top `n`. A profile with no usable likes falls back to
    /// a random catalog sample (cold start).
    pub fn recommend_for_user(&self, profile: &UserProfile, n: usize) -> Vec<RecommendationItem> {
        if profile.liked_titles.is_empty() {
            return self.sample_items(n);
        }

        let mut pooled: Vec<RecommendationItem> = Vec::new();
        for title in &profile.liked_titles {
            match self.content.recommend(title, NEIGHBORS_PER_LIKED_TITLE) {
                Ok(similar) => pooled.extend(similar),
                // Liked titles missing from this snapshot contribute nothing.
                Err(_) => continue,
            }
        }
        if pooled.is_empty() {
            return self.sample_items(n);
        }

        let mut seen = HashSet::with_capacity(pooled.len());
        pooled.retain(|item| seen.insert(item.id.clone()));
        let liked: HashSet<String> = profile
            .liked_titles
            .iter()
            .map(|title| title.to_lowercase())
            .collect();
        pooled.retain(|item| !liked.contains(&item.title.to_lowercase()));

        preference::rerank_by_preference(&mut pooled, &profile.genre_preferences);
        pooled.truncate(n);
        pooled
    }

    /// A genre- and type-diverse catalog sample for the first-visit survey.
    ///
    /// Takes a few movies and a few shows from every leading genre, then
    /// pads with random unpicked items up to `n`.
    pub fn diverse_titles(&self, n: usize) -> Vec<RecommendationItem> {
        if n == 0 || self.snapshot.is_empty() {
            return Vec::new();
        }
        let items = self.snapshot.items();

        let mut by_genre: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (index, item) in items.iter().enumerate() {
            if let Some(genre) = item.genres.first() {
                by_genre.entry(genre.as_str()).or_default().push(index);
            }
        }

        let per_genre = (n / by_genre.len().max(1)).max(2);
        let mut rng = thread_rng();
        let mut picked: Vec<usize> = Vec::new();
        let mut seen: HashSet<usize> = HashSet::new();

        for indices in by_genre.values() {
            for content_type in [ContentType::Movie, ContentType::Show] {
                let of_type: Vec<usize> = indices
                    .iter()
                    .copied()
                    .filter(|&index| items[index].content_type == content_type)
                    .collect();
                for &index in of_type.choose_multiple(&mut rng, (per_genre / 2).max(1)) {
                    if seen.insert(index) {
                        picked.push(index);
                    }
                }
            }
        }

        if picked.len() < n {
            let unpicked: Vec<usize> =
                (0..items.len()).filter(|index| !seen.contains(index)).collect();
            for &index in unpicked.choose_multiple(&mut rng, n - picked.len()) {
                picked.push(index);
            }
        }

        picked.truncate(n);
        picked
            .into_iter()
            .map(|index| RecommendationItem::from(&items[index]))
            .collect()
    }

    fn sample_items(&self, n: usize) -> Vec<RecommendationItem> {
        let mut rng = thread_rng();
        self.snapshot
            .items()
            .choose_multiple(&mut rng, n)
            .map(RecommendationItem::from)
            .collect()
    }
}
