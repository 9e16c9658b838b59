use crate::models::Movie;

/// Projects one movie into the text blob the vectorizer learns from
///
/// Title, description, genres, director, cast, language and year appear once
/// each, space-joined, with empty parts skipped.
pub fn movie_document(movie: &Movie) -> String {
    let genres = movie.genres.join(" ");
    let year = movie.year.map(|y| y.to_string()).unwrap_or_default();

    [
        movie.title.as_str(),
        movie.description.as_str(),
        genres.as_str(),
        movie.director.as_str(),
        movie.cast.as_str(),
        movie.language.as_str(),
        year.as_str(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

/// Builds the corpus, one document per movie in the same order
pub fn build_corpus(movies: &[Movie]) -> Vec<String> {
    movies.iter().map(movie_document).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieRecord;
    use serde_json::json;

    fn movie(value: serde_json::Value) -> Movie {
        Movie::from(serde_json::from_value::<MovieRecord>(value).unwrap())
    }

    #[test]
    fn test_document_field_order() {
        let m = movie(json!({
            "title": "Inception",
            "description": "A thief enters dreams",
            "genres": ["Sci-Fi", "Thriller"],
            "director": "Christopher Nolan",
            "castMembers": ["Leonardo DiCaprio", "Elliot Page"],
            "language": "en",
            "releaseDate": "2010-07-16"
        }));
        assert_eq!(
            movie_document(&m),
            "Inception A thief enters dreams Sci-Fi Thriller Christopher Nolan \
             Leonardo DiCaprio Elliot Page en 2010"
        );
    }

    #[test]
    fn test_empty_parts_are_skipped() {
        let m = movie(json!({ "title": "Heat", "language": "en" }));
        assert_eq!(movie_document(&m), "Heat en");
    }

    #[test]
    fn test_corpus_preserves_order() {
        let movies = vec![
            movie(json!({ "title": "B" })),
            movie(json!({ "title": "A" })),
        ];
        assert_eq!(build_corpus(&movies), vec!["B", "A"]);
    }
}
