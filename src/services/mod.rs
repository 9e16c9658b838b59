pub mod catalog;
pub mod corpus;
pub mod engine;
pub mod era;
pub mod favorites;
pub mod providers;
pub mod ranker;
pub mod stop_words;
pub mod vectorizer;
pub mod year;

pub use engine::RecommendationEngine;
pub use providers::{CatalogProvider, HttpCatalogProvider};
