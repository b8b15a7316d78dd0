//! Flat per-user profile records.
//!
//! One JSON document per user id under the store root, the full field set of
//! [`UserProfile`]. Writers to the same user serialize on a per-user lock;
//! writers to different users never block each other.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::{TitleGenres, UserProfile};
use crate::services::preference;

pub struct UserStore {
    root: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl UserStore {
    /// Opens the store, creating the root directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Fetches a user's profile; unknown users get a default profile, never
    /// an error.
    pub async fn get_profile(&self, user_id: &str) -> AppResult<UserProfile> {
        self.load(user_id).await
    }

    /// Adds liked titles (set union, idempotent) and refreshes genre
    /// preferences.
    ///
    /// `title_genres` is the catalog's lowercased title -> genres mapping,
    /// passed in explicitly so the store never reaches into a live engine.
    pub async fn add_liked_titles(
        &self,
        user_id: &str,
        titles: &[String],
        title_genres: &TitleGenres,
    ) -> AppResult<UserProfile> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let mut profile = self.load(user_id).await?;
        profile.liked_titles.extend(titles.iter().cloned());
        self.refresh_and_save(&mut profile, title_genres).await?;
        Ok(profile)
    }

    /// Upserts a rating and appends the title's first watch event.
    ///
    /// The rating must be an integer in [1, 5]; anything else fails with
    /// `InvalidRating` before any state is touched.
    pub async fn add_rating(
        &self,
        user_id: &str,
        title: &str,
        rating: i64,
        title_genres: &TitleGenres,
    ) -> AppResult<UserProfile> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::InvalidRating(rating));
        }
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let mut profile = self.load(user_id).await?;
        profile.ratings.insert(title.to_string(), rating as u8);
        profile.record_watch(title);
        self.refresh_and_save(&mut profile, title_genres).await?;
        Ok(profile)
    }

    /// Appends a watch event unless the title is already in the history.
    /// Re-adding a watched title is a complete no-op, timestamp included.
    pub async fn add_watch_event(&self, user_id: &str, title: &str) -> AppResult<UserProfile> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let mut profile = self.load(user_id).await?;
        if profile.record_watch(title) {
            profile.touch();
            self.save(&profile).await?;
        }
        Ok(profile)
    }

    async fn refresh_and_save(
        &self,
        profile: &mut UserProfile,
        title_genres: &TitleGenres,
    ) -> AppResult<()> {
        profile.genre_preferences =
            preference::genre_preferences(&profile.liked_titles, &profile.ratings, title_genres);
        profile.touch();
        self.save(profile).await
    }

    async fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(user_id.to_string()).or_default())
    }

    fn profile_path(&self, user_id: &str) -> AppResult<PathBuf> {
        // User ids are opaque external strings; refuse the ones that would
        // escape the store root.
        if user_id.is_empty() || user_id.contains(['/', '\\']) || user_id == "." || user_id == ".."
        {
            return Err(AppError::InvalidInput(format!(
                "invalid user id: {user_id:?}"
            )));
        }
        Ok(self.root.join(format!("{user_id}.json")))
    }

    async fn load(&self, user_id: &str) -> AppResult<UserProfile> {
        let path = self.profile_path(user_id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(UserProfile::new(user_id))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, profile: &UserProfile) -> AppResult<()> {
        let path = self.profile_path(&profile.user_id)?;
        let json = serde_json::to_vec_pretty(profile)?;
        tokio::fs::write(&path, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_genres(entries: &[(&str, &[&str])]) -> TitleGenres {
        entries
            .iter()
            .map(|(title, genres)| {
                (
                    title.to_string(),
                    genres.iter().map(|g| g.to_string()).collect(),
                )
            })
            .collect()
    }

    fn store() -> (tempfile::TempDir, UserStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_unknown_user_gets_default_profile() {
        let (_dir, store) = store();
        let profile = store.get_profile("user_42").await.unwrap();
        assert_eq!(profile.user_id, "user_42");
        assert!(profile.liked_titles.is_empty());
    }

    #[tokio::test]
    async fn test_profile_round_trips_through_disk() {
        let (_dir, store) = store();
        let genres = title_genres(&[("kota factory", &["Drama"])]);
        store
            .add_liked_titles("u1", &["Kota Factory".to_string()], &genres)
            .await
            .unwrap();

        let profile = store.get_profile("u1").await.unwrap();
        assert!(profile.liked_titles.contains("Kota Factory"));
        assert!((profile.genre_preferences["Drama"] - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_add_liked_titles_is_idempotent() {
        let (_dir, store) = store();
        let genres = title_genres(&[]);
        store
            .add_liked_titles("u1", &["A".to_string(), "A".to_string()], &genres)
            .await
            .unwrap();
        let profile = store
            .add_liked_titles("u1", &["A".to_string()], &genres)
            .await
            .unwrap();
        assert_eq!(profile.liked_titles.len(), 1);
    }

    #[tokio::test]
    async fn test_add_rating_upserts_and_records_watch() {
        let (_dir, store) = store();
        let genres = title_genres(&[("kota factory", &["Drama"])]);
        store
            .add_rating("u1", "Kota Factory", 3, &genres)
            .await
            .unwrap();
        let profile = store
            .add_rating("u1", "Kota Factory", 5, &genres)
            .await
            .unwrap();

        assert_eq!(profile.ratings["Kota Factory"], 5);
        assert_eq!(profile.watch_history.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_rating_rejected_before_mutation() {
        let (_dir, store) = store();
        let genres = title_genres(&[]);
        for rating in [0, 6, -1] {
            assert!(matches!(
                store.add_rating("u1", "A", rating, &genres).await,
                Err(AppError::InvalidRating(_))
            ));
        }
        let profile = store.get_profile("u1").await.unwrap();
        assert!(profile.ratings.is_empty());
        assert!(profile.watch_history.is_empty());
    }

    #[tokio::test]
    async fn test_watch_event_never_duplicates_a_title() {
        let (_dir, store) = store();
        store.add_watch_event("u1", "Title A").await.unwrap();
        let profile = store.add_watch_event("u1", "Title A").await.unwrap();
        assert_eq!(profile.watch_history.len(), 1);
    }

    #[tokio::test]
    async fn test_genre_preferences_mix_likes_and_ratings() {
        let (_dir, store) = store();
        let genres = title_genres(&[("a", &["Drama"]), ("b", &["Comedy"])]);
        store
            .add_liked_titles("u1", &["A".to_string()], &genres)
            .await
            .unwrap();
        let profile = store.add_rating("u1", "B", 5, &genres).await.unwrap();

        let total: f64 = profile.genre_preferences.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((profile.genre_preferences["Drama"] - 0.5).abs() < 1e-9);
        assert!((profile.genre_preferences["Comedy"] - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let (_dir, store) = store();
        let genres = title_genres(&[]);
        store
            .add_liked_titles("u1", &["A".to_string()], &genres)
            .await
            .unwrap();
        let other = store.get_profile("u2").await.unwrap();
        assert!(other.liked_titles.is_empty());
    }

    #[tokio::test]
    async fn test_path_escaping_user_ids_are_rejected() {
        let (_dir, store) = store();
        for user_id in ["", "..", "a/b", "a\\b"] {
            assert!(matches!(
                store.get_profile(user_id).await,
                Err(AppError::InvalidInput(_))
            ));
        }
    }
}
