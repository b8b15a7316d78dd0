use std::collections::HashSet;

use crate::error::AppResult;
use crate::models::{CatalogSnapshot, RecommendationItem};

use super::collaborative::CollaborativeModel;
use super::content::ContentRecommender;

/// Merges content-based and collaborative rankings into one list.
///
/// The split is fixed: content gets the larger share for odd `n`. Neither
/// source's allotment grows when the other comes up short, so the merged
/// list may legitimately hold fewer than `n` items.
pub struct HybridRecommender<'a> {
    content: &'a ContentRecommender,
    collaborative: &'a CollaborativeModel,
    snapshot: &'a CatalogSnapshot,
}

impl<'a> HybridRecommender<'a> {
    pub fn new(
        content: &'a ContentRecommender,
        collaborative: &'a CollaborativeModel,
        snapshot: &'a CatalogSnapshot,
    ) -> Self {
        Self {
            content,
            collaborative,
            snapshot,
        }
    }

    /// Concatenates the content half (keyed on `seed_title`) with the
    /// collaborative half (keyed on `user_id`), content first, deduplicated
    /// by item id keeping the first occurrence, truncated to `n`.
    ///
    /// Fails with `TitleNotFound` for an unknown seed title; an unknown user
    /// simply contributes an empty collaborative half.
    pub fn recommend(
        &self,
        user_id: &str,
        seed_title: &str,
        n: usize,
    ) -> AppResult<Vec<RecommendationItem>> {
        let content_share = n.div_ceil(2);
        let collaborative_share = n - content_share;

        let mut merged = self.content.recommend(seed_title, content_share)?;
        for item_id in self.collaborative.recommend(user_id, collaborative_share) {
            // Ids the snapshot does not know cannot be projected; drop them.
            if let Some(item) = self
                .snapshot
                .index_of_id(&item_id)
                .and_then(|index| self.snapshot.get(index))
            {
                merged.push(RecommendationItem::from(item));
            }
        }

        let mut seen = HashSet::with_capacity(merged.len());
        merged.retain(|item| seen.insert(item.id.clone()));
        merged.truncate(n);
        Ok(merged)
    }
}
