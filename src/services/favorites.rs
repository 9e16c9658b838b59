use std::collections::HashSet;

use crate::models::UserSignal;
use crate::services::catalog::{normalize_title, CatalogIndex};

/// Ratings at or above this count as an implicit favorite
pub const POSITIVE_RATING_THRESHOLD: f64 = 2.0;

/// Merges explicit favorites with positively rated titles
///
/// Titles are trimmed, blanks dropped, duplicates collapsed on the normalized
/// title (first occurrence wins) and anything the index does not know is
/// silently discarded.
pub fn resolve_favorites(
    index: &CatalogIndex,
    explicit: &[String],
    signals: &[UserSignal],
) -> Vec<String> {
    let implicit = signals
        .iter()
        .filter(|s| s.rating.is_some_and(|r| r >= POSITIVE_RATING_THRESHOLD))
        .filter_map(|s| s.movie_title.as_deref());

    let mut seen = HashSet::new();
    explicit
        .iter()
        .map(String::as_str)
        .chain(implicit)
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .filter(|title| seen.insert(normalize_title(title)))
        .filter(|title| index.lookup_position(title).is_some())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieRecord;
    use serde_json::json;

    fn index() -> CatalogIndex {
        CatalogIndex::fit(
            serde_json::from_value::<Vec<MovieRecord>>(json!([
                { "title": "Inception" },
                { "title": "Heat" },
                { "title": "Amelie" }
            ]))
            .unwrap(),
        )
    }

    fn signal(title: &str, rating: f64) -> UserSignal {
        UserSignal {
            movie_title: Some(title.to_string()),
            rating: Some(rating),
        }
    }

    #[test]
    fn test_explicit_before_implicit() {
        let favorites = resolve_favorites(
            &index(),
            &["Heat".to_string()],
            &[signal("Amelie", 4.0), signal("Inception", 5.0)],
        );
        assert_eq!(favorites, vec!["Heat", "Amelie", "Inception"]);
    }

    #[test]
    fn test_low_ratings_are_ignored() {
        let favorites = resolve_favorites(
            &index(),
            &[],
            &[signal("Amelie", 1.5), signal("Heat", 2.0)],
        );
        assert_eq!(favorites, vec!["Heat"]);
    }

    #[test]
    fn test_duplicates_and_blanks_collapse() {
        let favorites = resolve_favorites(
            &index(),
            &[" heat ".to_string(), "".to_string(), "HEAT".to_string()],
            &[signal("Heat", 5.0)],
        );
        assert_eq!(favorites, vec!["heat"]);
    }

    #[test]
    fn test_unknown_titles_are_dropped() {
        let favorites = resolve_favorites(
            &index(),
            &["Nonexistent".to_string(), "Inception".to_string()],
            &[UserSignal::default()],
        );
        assert_eq!(favorites, vec!["Inception"]);
    }
}
