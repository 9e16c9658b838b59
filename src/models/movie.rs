use serde::Deserialize;
use serde_json::Value;

use crate::services::year::extract_year;

/// Raw catalog entry as delivered by the upstream movie service
///
/// Upstream payloads are inconsistent about field names and shapes, so every
/// field is captured as an untyped value and reconciled once in
/// [`Movie::from`]. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieRecord {
    #[serde(rename = "movieID", default)]
    pub movie_id: Option<Value>,
    #[serde(rename = "MovieID", default)]
    pub movie_id_pascal: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,

    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub director: Option<Value>,
    #[serde(default)]
    pub language: Option<Value>,
    #[serde(default)]
    pub image: Option<Value>,

    #[serde(default)]
    pub genres: Option<Value>,
    #[serde(rename = "Genres", default)]
    pub genres_pascal: Option<Value>,

    #[serde(rename = "castMembers", default)]
    pub cast_members: Option<Value>,
    #[serde(default)]
    pub cast: Option<Value>,
    #[serde(default)]
    pub actors: Option<Value>,

    #[serde(rename = "releaseDate", default)]
    pub release_date: Option<Value>,
    #[serde(default)]
    pub year: Option<Value>,
}

/// Canonical movie used by the engine after normalization
///
/// Every field has a usable default, so corpus building, filtering and
/// result assembly never have to check for missing data again.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    /// Opaque upstream identifier, kept in its original JSON shape
    pub movie_id: Option<Value>,
    /// Whitespace-trimmed title
    pub title: String,
    pub description: String,
    pub genres: Vec<String>,
    pub director: String,
    /// Cast flattened into a single space-joined string
    pub cast: String,
    pub language: String,
    pub image: Option<String>,
    /// Release year, from the release date when parseable, else the bare year
    pub year: Option<i32>,
}

/// A value counts as populated unless it is null or an empty string
fn populated(value: &Option<Value>) -> Option<&Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => Some(v),
    }
}

/// First populated value in priority order
fn first_populated<'a>(candidates: &[&'a Option<Value>]) -> Option<&'a Value> {
    candidates.iter().copied().find_map(populated)
}

/// Stringifies scalars; arrays and objects are not text
fn as_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn as_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn as_cast(value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| as_text(Some(item)))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        other => as_text(other),
    }
}

impl From<MovieRecord> for Movie {
    fn from(record: MovieRecord) -> Self {
        let movie_id = first_populated(&[
            &record.movie_id,
            &record.movie_id_pascal,
            &record.id,
        ])
        .cloned();

        // An explicit `genres` key wins even when empty
        let genres = if record.genres.is_some() {
            as_string_list(record.genres.as_ref())
        } else {
            as_string_list(record.genres_pascal.as_ref())
        };

        let cast = as_cast(first_populated(&[
            &record.cast_members,
            &record.cast,
            &record.actors,
        ]));

        let year = record
            .release_date
            .as_ref()
            .and_then(extract_year)
            .or_else(|| record.year.as_ref().and_then(extract_year));

        let image = Some(as_text(populated(&record.image))).filter(|s| !s.is_empty());

        Movie {
            movie_id,
            title: as_text(record.title.as_ref()).trim().to_string(),
            description: as_text(record.description.as_ref()),
            genres,
            director: as_text(record.director.as_ref()),
            cast,
            language: as_text(record.language.as_ref()),
            image,
            year,
        }
    }
}
