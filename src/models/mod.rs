pub mod catalog;
pub mod profile;
pub mod recommendation;

pub use catalog::{
    CatalogItem, CatalogSnapshot, ContentType, Duration, DurationUnit, RatingRow, TitleGenres,
};
pub use profile::{UserProfile, WatchEvent};
pub use recommendation::RecommendationItem;
