mod movie;
mod recommendation;

pub use movie::{Movie, MovieRecord};
pub use recommendation::{FilterRequest, RecommendResponse, RecommendationItem, UserSignal};
