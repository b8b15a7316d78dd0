use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{CatalogItem, CatalogSnapshot, RecommendationItem};

use super::similarity::SimilarityIndex;

/// Ranks catalog items by text similarity to a seed title.
pub struct ContentRecommender {
    snapshot: Arc<CatalogSnapshot>,
    index: SimilarityIndex,
}

impl ContentRecommender {
    /// Builds the similarity index for a catalog snapshot.
    ///
    /// Fails with `EmptyCatalog` when the snapshot has no items; callers that
    /// prefer a degraded recommender over an error can fall back to
    /// [`ContentRecommender::empty`].
    pub fn fit(snapshot: Arc<CatalogSnapshot>) -> AppResult<Self> {
        if snapshot.is_empty() {
            return Err(AppError::EmptyCatalog);
        }
        let soups: Vec<String> = snapshot.items().iter().map(CatalogItem::soup).collect();
        let index = SimilarityIndex::build(&soups);
        Ok(Self { snapshot, index })
    }

    /// A recommender over an empty snapshot; every query yields an empty
    /// list instead of an error.
    pub fn empty() -> Self {
        Self {
            snapshot: Arc::new(CatalogSnapshot::default()),
            index: SimilarityIndex::default(),
        }
    }

    pub fn snapshot(&self) -> &Arc<CatalogSnapshot> {
        &self.snapshot
    }

    /// Top `n` items most similar to `title` (case-insensitive lookup).
    ///
    /// The seed item is always excluded from its own results; `n = 0` is an
    /// empty list, not an error. Fails with `TitleNotFound` when the title is
    /// absent from the snapshot.
    pub fn recommend(&self, title: &str, n: usize) -> AppResult<Vec<RecommendationItem>> {
        if self.snapshot.is_empty() {
            return Ok(Vec::new());
        }
        let item_index = self
            .snapshot
            .index_of_title(title)
            .ok_or_else(|| AppError::TitleNotFound(title.to_string()))?;
        let neighbors = self.index.similar(item_index, n)?;
        Ok(neighbors
            .into_iter()
            .filter_map(|(index, _)| self.snapshot.get(index))
            .map(RecommendationItem::from)
            .collect())
    }
}
