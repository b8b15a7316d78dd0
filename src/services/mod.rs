pub mod collaborative;
pub mod content;
pub mod engine;
pub mod evaluation;
pub mod hybrid;
pub mod preference;
pub mod similarity;

pub use collaborative::CollaborativeModel;
pub use content::ContentRecommender;
pub use engine::RecommendationEngine;
pub use hybrid::HybridRecommender;
pub use similarity::SimilarityIndex;
