use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One watch-history entry; a title appears at most once per user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchEvent {
    pub title: String,
    pub timestamp: DateTime<Utc>,
}

/// Per-user preference record persisted by the profile store
///
/// Created with empty fields on first access for a user id; mutated by
/// rating, liking and watch events; never deleted by the core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub liked_titles: BTreeSet<String>,
    /// Title -> rating in [1, 5]
    #[serde(default)]
    pub ratings: BTreeMap<String, u8>,
    #[serde(default)]
    pub watch_history: Vec<WatchEvent>,
    /// Genre -> weight in [0, 1]; weights sum to 1 when non-empty
    #[serde(default)]
    pub genre_preferences: BTreeMap<String, f64>,
    pub last_updated: DateTime<Utc>,
}

impl UserProfile {
    /// Creates a default profile for a user id
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            liked_titles: BTreeSet::new(),
            ratings: BTreeMap::new(),
            watch_history: Vec::new(),
            genre_preferences: BTreeMap::new(),
            last_updated: Utc::now(),
        }
    }

    /// Appends a watch event unless the title has been seen before.
    /// Returns whether an entry was added.
    pub fn record_watch(&mut self, title: &str) -> bool {
        if self.watch_history.iter().any(|event| event.title == title) {
            return false;
        }
        self.watch_history.push(WatchEvent {
            title: title.to_string(),
            timestamp: Utc::now(),
        });
        true
    }

    /// Stamps the profile as mutated now
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_is_empty() {
        let profile = UserProfile::new("user_1");
        assert_eq!(profile.user_id, "user_1");
        assert!(profile.liked_titles.is_empty());
        assert!(profile.ratings.is_empty());
        assert!(profile.watch_history.is_empty());
        assert!(profile.genre_preferences.is_empty());
    }

    #[test]
    fn test_record_watch_is_idempotent_per_title() {
        let mut profile = UserProfile::new("user_1");
        assert!(profile.record_watch("Title A"));
        assert!(!profile.record_watch("Title A"));
        assert!(profile.record_watch("Title B"));

        let titles: Vec<&str> = profile
            .watch_history
            .iter()
            .map(|event| event.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Title A", "Title B"]);
    }

    #[test]
    fn test_record_watch_keeps_original_timestamp() {
        let mut profile = UserProfile::new("user_1");
        profile.record_watch("Title A");
        let first = profile.watch_history[0].timestamp;
        profile.record_watch("Title A");
        assert_eq!(profile.watch_history[0].timestamp, first);
    }
}
