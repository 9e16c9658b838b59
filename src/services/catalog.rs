use std::collections::HashMap;

use crate::models::{Movie, MovieRecord};
use crate::services::corpus::build_corpus;
use crate::services::vectorizer::{SparseVector, TfidfVectorizer};

/// Key used for title lookups and result de-duplication
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Fully built, immutable recommendation state
///
/// Holds the normalized catalog, one TF-IDF row per movie (same order), the
/// fitted vectorizer and a title index. An index is never mutated after
/// [`CatalogIndex::fit`] returns; refits build a new one.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    movies: Vec<Movie>,
    rows: Vec<SparseVector>,
    vectorizer: TfidfVectorizer,
    titles: HashMap<String, usize>,
}

impl CatalogIndex {
    pub fn fit(records: Vec<MovieRecord>) -> Self {
        Self::fit_with(records, TfidfVectorizer::default())
    }

    pub fn fit_with(records: Vec<MovieRecord>, mut vectorizer: TfidfVectorizer) -> Self {
        let movies: Vec<Movie> = records.into_iter().map(Movie::from).collect();
        let rows = vectorizer.fit_transform(&build_corpus(&movies));

        // Later duplicates overwrite earlier ones
        let mut titles = HashMap::with_capacity(movies.len());
        for (position, movie) in movies.iter().enumerate() {
            if !movie.title.is_empty() {
                titles.insert(normalize_title(&movie.title), position);
            }
        }

        Self {
            movies,
            rows,
            vectorizer,
            titles,
        }
    }

    /// Position of a title in the catalog, matched on the normalized title
    pub fn lookup_position(&self, title: &str) -> Option<usize> {
        self.titles.get(&normalize_title(title)).copied()
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn movie(&self, position: usize) -> Option<&Movie> {
        self.movies.get(position)
    }

    pub fn row(&self, position: usize) -> Option<&SparseVector> {
        self.rows.get(position)
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<MovieRecord> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_fit_builds_one_row_per_movie() {
        let index = CatalogIndex::fit(records(json!([
            { "title": "Inception", "genres": ["Sci-Fi"] },
            { "title": "Heat", "genres": ["Crime"] }
        ])));
        assert_eq!(index.len(), 2);
        assert!(index.row(0).is_some());
        assert!(index.row(1).is_some());
        assert!(index.row(2).is_none());
        assert!(index.vectorizer().is_fitted());
    }

    #[test]
    fn test_lookup_uses_normalized_title() {
        let index = CatalogIndex::fit(records(json!([
            { "title": "  The Matrix " },
            { "title": "Heat" }
        ])));
        assert_eq!(index.lookup_position("the matrix"), Some(0));
        assert_eq!(index.lookup_position(" HEAT"), Some(1));
        assert_eq!(index.lookup_position("Alien"), None);
    }

    #[test]
    fn test_last_duplicate_title_wins() {
        let index = CatalogIndex::fit(records(json!([
            { "title": "Dune", "releaseDate": "1984-12-14" },
            { "title": "Dune", "releaseDate": "2021-10-22" }
        ])));
        assert_eq!(index.lookup_position("Dune"), Some(1));
    }

    #[test]
    fn test_empty_catalog() {
        let index = CatalogIndex::fit(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.lookup_position("anything"), None);
    }

    #[test]
    fn test_untitled_movies_are_not_indexed() {
        let index = CatalogIndex::fit(records(json!([{ "description": "lost reel" }])));
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup_position(""), None);
    }
}
