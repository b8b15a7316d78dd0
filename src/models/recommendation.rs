use serde::{Deserialize, Serialize};

use super::catalog::{CatalogItem, ContentType, Duration};

/// External projection of a catalog item returned to the serving layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub genres: Vec<String>,
    pub description: String,
    pub release_year: Option<i32>,
    pub duration: Option<Duration>,
    pub rating: Option<String>,
}

impl From<&CatalogItem> for RecommendationItem {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            content_type: item.content_type,
            genres: item.genres.clone(),
            description: item.description.clone(),
            release_year: item.release_year,
            duration: item.duration,
            rating: item.rating.clone(),
        }
    }
}
