//! Movie payload validation.
//!
//! Every payload shares one JSON shape, `{title, year, cast, genres}`; the
//! rule set decides which fields are required and whether cast and genres
//! are referenced by id (API) or by name (bulk import).

use super::error::ValidationError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Characters an actor name must not contain.
pub const FORBIDDEN_ACTOR_NAME_CHARS: [char; 4] = ['$', '(', ')', '?'];

pub fn validate_actor_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyField("cast"));
    }
    match name.chars().find(|c| FORBIDDEN_ACTOR_NAME_CHARS.contains(c)) {
        Some(character) => Err(ValidationError::ForbiddenCharacter {
            name: name.to_string(),
            character,
        }),
        None => Ok(()),
    }
}

/// The raw payload, before any rule set is applied.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoviePayload<R> {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub cast: Option<Vec<R>>,
    pub genres: Option<Vec<R>>,
}

/// A validated API create request; cast and genres are existing ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub cast: Vec<i64>,
    pub genres: Vec<i64>,
}

/// A validated update request. `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub cast: Option<Vec<i64>>,
    pub genres: Option<Vec<i64>>,
}

/// A validated bulk import entry; cast and genres are names.
///
/// Actor names are not checked here: a bad name only drops that actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkMovie {
    pub title: String,
    pub year: i32,
    pub cast: Vec<String>,
    pub genres: Vec<String>,
}

/// A set of rules turning a raw payload into a typed request.
pub trait ValidationRules {
    /// How cast and genre entries are referenced.
    type Reference: DeserializeOwned;
    type Output;

    fn check(payload: MoviePayload<Self::Reference>) -> Result<Self::Output, ValidationError>;
}

pub struct CreateRules;
pub struct UpdateRules;
pub struct BulkRules;

fn required_title(title: Option<String>) -> Result<String, ValidationError> {
    let title = title.ok_or(ValidationError::MissingField("title"))?;
    non_empty_title(title)
}

fn non_empty_title(title: String) -> Result<String, ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyField("title"));
    }
    Ok(title)
}

impl ValidationRules for CreateRules {
    type Reference = i64;
    type Output = NewMovie;

    fn check(payload: MoviePayload<i64>) -> Result<NewMovie, ValidationError> {
        Ok(NewMovie {
            title: required_title(payload.title)?,
            year: payload.year.ok_or(ValidationError::MissingField("year"))?,
            cast: payload.cast.unwrap_or_default(),
            genres: payload.genres.unwrap_or_default(),
        })
    }
}

impl ValidationRules for UpdateRules {
    type Reference = i64;
    type Output = MovieUpdate;

    fn check(payload: MoviePayload<i64>) -> Result<MovieUpdate, ValidationError> {
        Ok(MovieUpdate {
            title: payload.title.map(non_empty_title).transpose()?,
            year: payload.year,
            cast: payload.cast,
            genres: payload.genres,
        })
    }
}

impl ValidationRules for BulkRules {
    type Reference = String;
    type Output = BulkMovie;

    fn check(payload: MoviePayload<String>) -> Result<BulkMovie, ValidationError> {
        let genres = payload.genres.unwrap_or_default();
        if genres.iter().any(|g| g.trim().is_empty()) {
            return Err(ValidationError::EmptyField("genres"));
        }
        Ok(BulkMovie {
            title: required_title(payload.title)?,
            year: payload.year.ok_or(ValidationError::MissingField("year"))?,
            cast: payload.cast.unwrap_or_default(),
            genres,
        })
    }
}

/// Validate `value` against the rule set `R`.
pub fn validate<R: ValidationRules>(value: &Value) -> Result<R::Output, ValidationError> {
    if !value.is_object() {
        return Err(ValidationError::InvalidType(
            "expected a JSON object".to_string(),
        ));
    }
    let payload = MoviePayload::<R::Reference>::deserialize(value)
        .map_err(|e| ValidationError::InvalidType(e.to_string()))?;
    R::check(payload)
}
