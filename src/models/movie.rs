//! Movie model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};

use super::parse_date;

/// Movie row as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub release_date: NaiveDate,
    /// Running time in minutes
    pub duration: i32,
    pub plot: String,
    pub poster_url: String,
    pub trailer_url: String,
    pub language: String,
    pub nationality_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Scalar movie fields after request validation
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub plot: String,
    pub poster_url: String,
    pub trailer_url: String,
    pub language: String,
    pub nationality_id: i32,
}

/// Create / update movie request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct MovieRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    /// Release date, `YYYY-MM-DD`
    pub release_date: String,
    #[validate(range(min = 0, message = "Duration cannot be negative"))]
    #[serde(default)]
    pub duration: i32,
    #[serde(default)]
    pub plot: String,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub trailer_url: String,
    #[serde(default)]
    pub language: String,
    pub nationality_id: i32,
    /// Desired genre membership of the movie
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

impl MovieRequest {
    /// Validated scalar fields; fails on a release date that is not `YYYY-MM-DD`
    pub fn to_new_movie(&self) -> AppResult<NewMovie> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }

        Ok(NewMovie {
            title: title.to_string(),
            release_date: parse_date(&self.release_date)?,
            duration: self.duration,
            plot: self.plot.clone(),
            poster_url: self.poster_url.clone(),
            trailer_url: self.trailer_url.clone(),
            language: self.language.clone(),
            nationality_id: self.nationality_id,
        })
    }
}

/// Movie aggregate view: scalar fields plus current genre ids
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovieResponse {
    pub id: i32,
    pub title: String,
    /// `YYYY-MM-DD`
    pub release_date: NaiveDate,
    pub duration: i32,
    pub plot: String,
    pub poster_url: String,
    pub trailer_url: String,
    pub language: String,
    pub nationality_id: i32,
    pub genre_ids: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MovieResponse {
    pub fn new(movie: Movie, genre_ids: Vec<i32>) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            release_date: movie.release_date,
            duration: movie.duration,
            plot: movie.plot,
            poster_url: movie.poster_url,
            trailer_url: movie.trailer_url,
            language: movie.language,
            nationality_id: movie.nationality_id,
            genre_ids,
            created_at: movie.created_at,
            updated_at: movie.updated_at,
        }
    }
}

/// Returned after a successful create
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MovieCreated {
    pub movie_id: i32,
}

/// Movie search query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct MovieSearchQuery {
    pub title: Option<String>,
}
