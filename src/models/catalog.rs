use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Lowercased title -> genres mapping derived from a catalog snapshot.
///
/// Passed explicitly into profile-store mutations so the store never reaches
/// into a live engine instance.
pub type TitleGenres = HashMap<String, Vec<String>>;

/// Type of content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Movie,
    Show,
}

/// Unit of a title's duration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    /// Runtime in minutes (movies)
    Minutes,
    /// Number of seasons (shows)
    Seasons,
}

/// Length of a movie or show
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Duration {
    pub value: u32,
    pub unit: DurationUnit,
}

/// A single movie or show from the cleaned catalog table
///
/// Immutable once loaded into a snapshot; a fresh ingestion produces a new
/// snapshot rather than mutating items in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    /// Stable external identifier
    pub id: String,
    /// Display title; not guaranteed unique across the catalog
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// Genres in source order
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub duration: Option<Duration>,
    /// Content rating label (e.g. "TV-MA")
    #[serde(default)]
    pub rating: Option<String>,
}

impl CatalogItem {
    /// Combined text features for term weighting: title, director, cast,
    /// genres and description, lowercased with punctuation collapsed to
    /// spaces.
    pub fn soup(&self) -> String {
        let mut parts: Vec<&str> = vec![self.title.as_str()];
        if let Some(director) = &self.director {
            parts.push(director);
        }
        parts.extend(self.cast.iter().map(String::as_str));
        parts.extend(self.genres.iter().map(String::as_str));
        parts.push(&self.description);
        normalize_text(&parts.join(" "))
    }
}

/// One row of the flat ratings table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingRow {
    pub user_id: String,
    pub item_id: String,
    /// Rating in [1, 5]; absent (user, item) pairs mean "unrated"
    pub rating: f32,
}

/// Lowercases text and replaces every non-alphanumeric run with a single
/// space.
pub fn normalize_text(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_space && !normalized.is_empty() {
                normalized.push(' ');
            }
            pending_space = false;
            normalized.extend(c.to_lowercase());
        } else {
            pending_space = true;
        }
    }
    normalized
}

/// Immutable catalog snapshot with derived lookup tables.
///
/// Item order is fixed at construction and shared with the similarity index
/// built from this snapshot for the lifetime of both.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    items: Vec<CatalogItem>,
    title_index: HashMap<String, usize>,
    id_index: HashMap<String, usize>,
    title_genres: TitleGenres,
}

impl CatalogSnapshot {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        let mut title_index = HashMap::with_capacity(items.len());
        let mut id_index = HashMap::with_capacity(items.len());
        let mut title_genres = TitleGenres::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let key = item.title.to_lowercase();
            // Duplicate titles resolve to the first occurrence in snapshot
            // order; the genre mapping follows the same policy.
            title_index.entry(key.clone()).or_insert(index);
            title_genres
                .entry(key)
                .or_insert_with(|| item.genres.clone());
            id_index.entry(item.id.clone()).or_insert(index);
        }
        Self {
            items,
            title_index,
            id_index,
            title_genres,
        }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    /// Case-insensitive title lookup; duplicate titles resolve to the first
    /// occurrence in snapshot order.
    pub fn index_of_title(&self, title: &str) -> Option<usize> {
        self.title_index.get(&title.to_lowercase()).copied()
    }

    pub fn index_of_id(&self, id: &str) -> Option<usize> {
        self.id_index.get(id).copied()
    }

    /// Lowercased title -> genres mapping for preference updates.
    pub fn title_genres(&self) -> &TitleGenres {
        &self.title_genres
    }
}
