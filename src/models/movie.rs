use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const NO_CAST: &str = "No cast information";
pub const NO_DIRECTOR: &str = "No director information";
pub const NO_GENRES: &str = "No genre information";
pub const NO_COUNTRIES: &str = "No production country information";

/// Maximum number of actors attached to a search result
pub const CAST_LIMIT: usize = 8;

/// Person reference; the id is a string so placeholders can use `"0"`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub id: String,
    pub name: String,
}

impl Person {
    fn placeholder(name: &str) -> Self {
        Self {
            id: "0".to_string(),
            name: name.to_string(),
        }
    }
}

/// A TMDb search result with credits and detail fields attached
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedMovie {
    /// Raw search result as returned by TMDb
    #[serde(flatten)]
    pub movie: Map<String, Value>,
    pub cast: Vec<Person>,
    pub director: Person,
    pub genres: String,
    pub production_countries: String,
}

impl EnrichedMovie {
    pub fn new(movie: Map<String, Value>, credits: &TmdbCredits, details: &TmdbMovieDetails) -> Self {
        let cast = credits
            .cast
            .iter()
            .filter(|actor| actor.character.as_deref().is_some_and(|c| !c.is_empty()))
            .take(CAST_LIMIT)
            .map(|actor| Person {
                id: actor.id.to_string(),
                name: actor.name.clone(),
            })
            .collect();

        let director = credits
            .crew
            .iter()
            .find(|member| member.job.as_deref() == Some("Director"))
            .map(|member| Person {
                id: member.id.to_string(),
                name: member.name.clone(),
            })
            .unwrap_or_else(|| Person::placeholder(NO_DIRECTOR));

        Self {
            movie,
            cast,
            director,
            genres: join_names(details.genres.iter().map(|g| g.name.as_str()), NO_GENRES),
            production_countries: join_names(
                details.production_countries.iter().map(|c| c.name.as_str()),
                NO_COUNTRIES,
            ),
        }
    }

    /// Result used when credits or details could not be fetched
    pub fn degraded(movie: Map<String, Value>) -> Self {
        Self {
            movie,
            cast: vec![Person::placeholder(NO_CAST)],
            director: Person::placeholder(NO_DIRECTOR),
            genres: NO_GENRES.to_string(),
            production_countries: NO_COUNTRIES.to_string(),
        }
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>, fallback: &str) -> String {
    let joined = names.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        fallback.to_string()
    } else {
        joined
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MovieSearchResponse {
    pub results: Vec<EnrichedMovie>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrailerResponse {
    pub trailer_url: String,
}

// ============================================================================
// TMDb API Types
// ============================================================================

/// Response of `/search/movie`; results are kept as raw objects
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCastMember>,
    #[serde(default)]
    pub crew: Vec<TmdbCrewMember>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TmdbCastMember {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TmdbCrewMember {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub genres: Vec<TmdbNamed>,
    #[serde(default)]
    pub production_countries: Vec<TmdbNamed>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TmdbNamed {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbVideosResponse {
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TmdbVideo {
    pub key: String,
    pub site: String,
    #[serde(rename = "type", default)]
    pub video_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_movie() -> Map<String, Value> {
        json!({ "id": 603, "title": "The Matrix", "poster_path": "/matrix.jpg" })
            .as_object()
            .unwrap()
            .clone()
    }

    #[test]
    fn test_credits_deserialization_skips_unknown_fields() {
        let json = r#"{
            "id": 603,
            "cast": [
                { "id": 6384, "name": "Keanu Reeves", "character": "Neo", "order": 0 },
                { "id": 1, "name": "Uncredited", "character": "" }
            ],
            "crew": [
                { "id": 9340, "name": "Lana Wachowski", "job": "Director", "department": "Directing" }
            ]
        }"#;
        let credits: TmdbCredits = serde_json::from_str(json).unwrap();
        assert_eq!(credits.cast.len(), 2);
        assert_eq!(credits.crew[0].job.as_deref(), Some("Director"));
    }

    #[test]
    fn test_enrich_filters_uncredited_and_limits_cast() {
        let mut cast: Vec<TmdbCastMember> = (0..12)
            .map(|i| TmdbCastMember {
                id: i,
                name: format!("Actor {}", i),
                character: Some(format!("Role {}", i)),
            })
            .collect();
        cast.insert(
            0,
            TmdbCastMember {
                id: 99,
                name: "Extra".to_string(),
                character: Some(String::new()),
            },
        );
        let credits = TmdbCredits { cast, crew: vec![] };
        let details = TmdbMovieDetails {
            genres: vec![
                TmdbNamed { name: "Action".to_string() },
                TmdbNamed { name: "SF".to_string() },
            ],
            production_countries: vec![],
        };

        let movie = EnrichedMovie::new(raw_movie(), &credits, &details);
        assert_eq!(movie.cast.len(), CAST_LIMIT);
        assert_eq!(movie.cast[0].name, "Actor 0");
        assert_eq!(movie.director, Person::placeholder(NO_DIRECTOR));
        assert_eq!(movie.genres, "Action, SF");
        assert_eq!(movie.production_countries, NO_COUNTRIES);
    }

    #[test]
    fn test_enriched_movie_flattens_raw_fields() {
        let movie = EnrichedMovie::degraded(raw_movie());
        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(json["title"], "The Matrix");
        assert_eq!(json["cast"][0]["id"], "0");
        assert_eq!(json["director"]["name"], NO_DIRECTOR);
        assert_eq!(json["genres"], NO_GENRES);
    }

    #[test]
    fn test_trailer_response_uses_camel_case() {
        let response = TrailerResponse {
            trailer_url: "https://www.youtube.com/watch?v=abc".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["trailerUrl"], "https://www.youtube.com/watch?v=abc");
    }
}
