//! Business logic services

pub mod auth;
pub mod lookups;
pub mod movie_actors;
pub mod movie_directors;
pub mod movie_genres;
pub mod movies;
pub mod people;
pub mod recommendations;
pub mod storage;
pub mod tokens;

use std::sync::Arc;

use argon2::Argon2;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{Lookup, LookupKind, Movie, MovieResponse, Person, PersonKind},
    repository::{Store, UnitOfWork},
};

use self::{storage::ObjectStore, tokens::TokenIssuer};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub tokens: TokenIssuer,
    pub movies: movies::MoviesService,
    pub movie_genres: movie_genres::MovieGenresService,
    pub movie_directors: movie_directors::MovieDirectorsService,
    pub movie_actors: movie_actors::MovieActorsService,
    pub actors: people::PeopleService,
    pub directors: people::PeopleService,
    pub genres: lookups::LookupsService,
    pub nationals: lookups::LookupsService,
    pub recommendations: recommendations::RecommendationsService,
}

impl Services {
    /// Wire every service onto the given store, object store and token issuer
    pub fn new(
        store: Arc<dyn Store>,
        objects: Arc<dyn ObjectStore>,
        tokens: TokenIssuer,
        hasher: Argon2<'static>,
        auth_config: &AuthConfig,
    ) -> Self {
        let movie_genres = movie_genres::MovieGenresService::new(store.clone());

        Self {
            auth: auth::AuthService::new(
                store.clone(),
                tokens.clone(),
                hasher,
                auth_config.default_role.clone(),
            ),
            movies: movies::MoviesService::new(store.clone(), movie_genres.clone(), objects),
            movie_directors: movie_directors::MovieDirectorsService::new(store.clone()),
            movie_actors: movie_actors::MovieActorsService::new(store.clone()),
            actors: people::PeopleService::new(store.clone(), PersonKind::Actor),
            directors: people::PeopleService::new(store.clone(), PersonKind::Director),
            genres: lookups::LookupsService::new(store.clone(), LookupKind::Genre),
            nationals: lookups::LookupsService::new(store.clone(), LookupKind::National),
            recommendations: recommendations::RecommendationsService::new(store),
            movie_genres,
            tokens,
        }
    }
}

pub(crate) async fn require_movie(uow: &mut dyn UnitOfWork, movie_id: i32) -> AppResult<Movie> {
    uow.movies_get_by_id(movie_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Movie with id {} not found", movie_id)))
}

pub(crate) async fn require_person(uow: &mut dyn UnitOfWork, kind: PersonKind, id: i32) -> AppResult<Person> {
    uow.people_get_by_id(kind, id).await?.ok_or_else(|| match kind {
        PersonKind::Actor => AppError::NotFound(format!("Actor with id {} not found", id)),
        PersonKind::Director => AppError::NotFound(format!("Director with id {} not found", id)),
    })
}

pub(crate) async fn require_lookup(uow: &mut dyn UnitOfWork, kind: LookupKind, id: i32) -> AppResult<Lookup> {
    uow.lookups_get_by_id(kind, id).await?.ok_or_else(|| match kind {
        LookupKind::Genre => AppError::NotFound(format!("Genre with id {} not found", id)),
        LookupKind::National => AppError::NotFound(format!("National with id {} not found", id)),
    })
}

/// Movie joined with its current genre ids
pub(crate) async fn movie_view(uow: &mut dyn UnitOfWork, movie: Movie) -> AppResult<MovieResponse> {
    let genre_ids = uow
        .movie_genres_list(movie.id)
        .await?
        .into_iter()
        .map(|g| g.genre_id)
        .collect();
    Ok(MovieResponse::new(movie, genre_ids))
}

pub(crate) async fn movie_views(uow: &mut dyn UnitOfWork, movies: Vec<Movie>) -> AppResult<Vec<MovieResponse>> {
    let mut views = Vec::with_capacity(movies.len());
    for movie in movies {
        views.push(movie_view(uow, movie).await?);
    }
    Ok(views)
}
