//! Link-table rows and the aggregate views built from them

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::Movie;

/// Short movie header used in association views
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovieSummary {
    pub movie_id: i32,
    pub title: String,
    pub release_date: NaiveDate,
}

impl From<&Movie> for MovieSummary {
    fn from(movie: &Movie) -> Self {
        Self {
            movie_id: movie.id,
            title: movie.title.clone(),
            release_date: movie.release_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LinkedGenre {
    pub genre_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LinkedDirector {
    pub director_id: i32,
    pub name: String,
    pub date_of_birth: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LinkedActor {
    pub actor_id: i32,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovieGenres {
    pub movie: MovieSummary,
    pub genres: Vec<LinkedGenre>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovieDirectors {
    pub movie: MovieSummary,
    pub directors: Vec<LinkedDirector>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovieActors {
    pub movie: MovieSummary,
    pub actors: Vec<LinkedActor>,
}

/// Body of the genre add / set endpoints
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenreIdsRequest {
    pub genre_ids: Vec<i32>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LinkDirectorRequest {
    pub director_id: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LinkActorRequest {
    pub actor_id: i32,
    #[validate(length(min = 1, max = 255, message = "Role is required"))]
    pub role: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateActorRoleRequest {
    #[validate(length(min = 1, max = 255, message = "Role is required"))]
    pub role: String,
}

/// Delta applied by a genre reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GenreDiff {
    pub added: Vec<i32>,
    pub removed: Vec<i32>,
}

impl GenreDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecommendRequest {
    pub movie_id: i32,
}
