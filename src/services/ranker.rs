use std::collections::HashSet;

use crate::error::AppResult;
use crate::models::{FilterRequest, Movie, RecommendationItem};
use crate::services::catalog::{normalize_title, CatalogIndex};
use crate::services::era::in_era;
use crate::services::vectorizer::{cosine_similarity, SparseVector};

/// Score given to pinned favorites
pub const PINNED_SCORE: f64 = 1.0;

/// Ranks the catalog against the request
///
/// `favorites` must already be resolved against `index`; titles that do not
/// resolve are skipped. Pinned favorites come first and do not count
/// against `top_n`.
pub fn recommend(
    index: &CatalogIndex,
    filters: &FilterRequest,
    favorites: &[String],
    top_n: usize,
) -> AppResult<Vec<RecommendationItem>> {
    let favorite_positions = favorite_positions(index, favorites);
    let query = build_query_vector(index, filters, &favorite_positions)?;

    let mut scored: Vec<(usize, f64)> = select_candidates(index, filters)
        .into_iter()
        .filter_map(|position| {
            index
                .row(position)
                .map(|row| (position, cosine_similarity(row, &query).clamp(0.0, 1.0)))
        })
        .collect();
    // Stable, so ties keep catalog order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut results = Vec::with_capacity(favorite_positions.len() + top_n);
    let mut seen: HashSet<String> = HashSet::new();

    for &position in &favorite_positions {
        if let Some(movie) = index.movie(position) {
            if seen.insert(normalize_title(&movie.title)) {
                results.push(RecommendationItem::from_movie(movie, PINNED_SCORE));
            }
        }
    }

    let mut ranked = 0;
    for (position, score) in scored {
        if ranked >= top_n {
            break;
        }
        let Some(movie) = index.movie(position) else {
            continue;
        };
        if seen.insert(normalize_title(&movie.title)) {
            results.push(RecommendationItem::from_movie(movie, score));
            ranked += 1;
        }
    }

    Ok(results)
}

fn favorite_positions(index: &CatalogIndex, favorites: &[String]) -> Vec<usize> {
    favorites
        .iter()
        .filter_map(|title| index.lookup_position(title))
        .collect()
}

/// Catalog positions passing every active filter, or the whole catalog
/// when nothing passes
pub fn select_candidates(index: &CatalogIndex, filters: &FilterRequest) -> Vec<usize> {
    let language = filters.active_language().map(str::to_lowercase);
    let era = filters.active_era();
    let genres: HashSet<String> = filters
        .genres
        .iter()
        .map(|g| g.trim().to_lowercase())
        .filter(|g| !g.is_empty())
        .collect();

    let matches = |movie: &Movie| {
        if let Some(language) = &language {
            if movie.language.trim().to_lowercase() != *language {
                return false;
            }
        }
        if let Some(era) = era {
            if !in_era(movie.year, era) {
                return false;
            }
        }
        if !genres.is_empty()
            && !movie
                .genres
                .iter()
                .any(|g| genres.contains(&g.trim().to_lowercase()))
        {
            return false;
        }
        true
    };

    let candidates: Vec<usize> = index
        .movies()
        .iter()
        .enumerate()
        .filter(|&(_, movie)| matches(movie))
        .map(|(position, _)| position)
        .collect();

    if candidates.is_empty() {
        tracing::debug!("No movie passed the filters, ranking the full catalog");
        (0..index.len()).collect()
    } else {
        candidates
    }
}

/// Sum of the favorites' rows, or a short text query built from the filters
pub fn build_query_vector(
    index: &CatalogIndex,
    filters: &FilterRequest,
    favorite_positions: &[usize],
) -> AppResult<SparseVector> {
    if !favorite_positions.is_empty() {
        let mut profile = SparseVector::default();
        for &position in favorite_positions {
            if let Some(row) = index.row(position) {
                profile.add_scaled(row, 1.0);
            }
        }
        return Ok(profile);
    }

    let mut parts: Vec<&str> = filters
        .genres
        .iter()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .collect();
    parts.extend(filters.active_language());
    parts.extend(filters.active_era());

    let query = if parts.is_empty() {
        "movie".to_string()
    } else {
        parts.join(" ")
    };
    index.vectorizer().transform(&query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieRecord;
    use serde_json::json;

    fn index(value: serde_json::Value) -> CatalogIndex {
        CatalogIndex::fit(serde_json::from_value::<Vec<MovieRecord>>(value).unwrap())
    }

    fn catalog() -> CatalogIndex {
        index(json!([
            { "title": "Inception", "description": "A thief steals secrets through dream sharing",
              "genres": ["Sci-Fi", "Thriller"], "director": "Christopher Nolan",
              "language": "en", "releaseDate": "2010-07-16" },
            { "title": "Interstellar", "description": "Explorers travel through a wormhole in space",
              "genres": ["Sci-Fi", "Drama"], "director": "Christopher Nolan",
              "language": "en", "releaseDate": "2014-11-07" },
            { "title": "Heat", "description": "A detective hunts a crew of bank robbers",
              "genres": ["Crime", "Thriller"], "director": "Michael Mann",
              "language": "en", "releaseDate": "1995-12-15" },
            { "title": "Amelie", "description": "A shy waitress changes the lives of those around her",
              "genres": ["Comedy", "Romance"], "director": "Jean-Pierre Jeunet",
              "language": "fr", "releaseDate": "2001-04-25" },
            { "title": "The Godfather", "description": "The aging patriarch of a crime dynasty",
              "genres": ["Crime", "Drama"], "director": "Francis Ford Coppola",
              "language": "en", "year": 1972 }
        ]))
    }

    fn titles(items: &[RecommendationItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_single_candidate_scenario() {
        let index = index(json!([
            { "title": "A", "genres": ["Action"], "language": "en", "releaseDate": "1995-01-01" },
            { "title": "B", "genres": ["Drama"], "language": "fr", "releaseDate": "2010-01-01" }
        ]));
        let filters = FilterRequest {
            genres: vec!["Action".to_string()],
            language: Some("en".to_string()),
            ..Default::default()
        };

        assert_eq!(select_candidates(&index, &filters), vec![0]);

        let results = recommend(&index, &filters, &[], 20).unwrap();
        assert_eq!(titles(&results), vec!["A"]);
        assert!((0.0..=1.0).contains(&results[0].score));
    }

    #[test]
    fn test_favorite_is_pinned_first() {
        let index = catalog();
        let filters = FilterRequest {
            genres: vec!["Comedy".to_string()],
            language: Some("fr".to_string()),
            ..Default::default()
        };
        let results = recommend(&index, &filters, &["Inception".to_string()], 20).unwrap();
        assert_eq!(results[0].title, "Inception");
        assert_eq!(results[0].score, 1.0);
    }

    #[test]
    fn test_favorite_profile_ranks_similar_movies() {
        let index = catalog();
        let results =
            recommend(&index, &FilterRequest::default(), &["Inception".to_string()], 20).unwrap();
        assert_eq!(results[0].title, "Inception");
        assert_eq!(results[1].title, "Interstellar");
    }

    #[test]
    fn test_over_filtering_falls_back_to_full_catalog() {
        let index = catalog();
        let filters = FilterRequest {
            genres: vec!["Western".to_string()],
            ..Default::default()
        };
        assert_eq!(select_candidates(&index, &filters).len(), index.len());
        let results = recommend(&index, &filters, &[], 3).unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_filters_are_case_insensitive() {
        let index = catalog();
        let filters = FilterRequest {
            genres: vec!["crime".to_string()],
            language: Some("EN".to_string()),
            era: Some("Before 1980".to_string()),
            ..Default::default()
        };
        assert_eq!(select_candidates(&index, &filters), vec![4]);
    }

    #[test]
    fn test_era_filter_excludes_unknown_years() {
        let index = index(json!([
            { "title": "Undated", "genres": ["Drama"] },
            { "title": "Dated", "genres": ["Drama"], "year": 1990 }
        ]));
        let filters = FilterRequest {
            era: Some("1980–2000".to_string()),
            ..Default::default()
        };
        assert_eq!(select_candidates(&index, &filters), vec![1]);
    }

    #[test]
    fn test_top_n_caps_only_ranked_tail() {
        let index = catalog();
        let favorites = vec!["Heat".to_string(), "Amelie".to_string()];
        let results = recommend(&index, &FilterRequest::default(), &favorites, 2).unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(titles(&results)[..2], ["Heat", "Amelie"]);
    }

    #[test]
    fn test_no_duplicate_titles() {
        let index = index(json!([
            { "title": "Dune", "genres": ["Sci-Fi"], "year": 1984 },
            { "title": "dune ", "genres": ["Sci-Fi"], "year": 2021 },
            { "title": "Alien", "genres": ["Sci-Fi"], "year": 1979 }
        ]));
        let favorites = vec!["Dune".to_string(), "DUNE".to_string()];
        let results = recommend(&index, &FilterRequest::default(), &favorites, 20).unwrap();

        let mut keys: Vec<String> = results.iter().map(|i| normalize_title(&i.title)).collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
        assert_eq!(results[0].score, 1.0);
        assert!(results.len() <= 1 + 20);
    }

    #[test]
    fn test_unresolved_favorites_are_ignored() {
        let index = catalog();
        let results =
            recommend(&index, &FilterRequest::default(), &["Nope".to_string()], 20).unwrap();
        assert_eq!(results.len(), index.len());
        assert!(results.iter().all(|i| i.score <= 1.0));
    }

    #[test]
    fn test_empty_filters_use_fallback_query() {
        let index = catalog();
        let query = build_query_vector(&index, &FilterRequest::default(), &[]).unwrap();
        assert!(query.is_empty());
        let results = recommend(&index, &FilterRequest::default(), &[], 20).unwrap();
        assert_eq!(titles(&results)[0], "Inception");
        assert!(results.iter().all(|i| i.score == 0.0));
    }

    #[test]
    fn test_scores_are_descending() {
        let index = catalog();
        let filters = FilterRequest {
            genres: vec!["Thriller".to_string()],
            ..Default::default()
        };
        let results = recommend(&index, &filters, &[], 20).unwrap();
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
