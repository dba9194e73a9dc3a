//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, health, lookups, movie_links, movies, people, recommendations};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "eFilm API",
        version = "1.0.0",
        description = "Film catalog REST API: movies, actors, directors, genres and their associations"
    ),
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Movies
        movies::list_movies,
        movies::search_movies,
        movies::get_movie,
        movies::create_movie,
        movies::update_movie,
        movies::delete_movie,
        movies::upload_poster,
        movies::list_movies_by_genre,
        // Movie links
        movie_links::list_movie_actors,
        movie_links::link_actor,
        movie_links::update_actor_role,
        movie_links::unlink_actor,
        movie_links::list_movie_directors,
        movie_links::link_director,
        movie_links::unlink_director,
        movie_links::list_movie_genres,
        movie_links::add_genres,
        movie_links::set_genres,
        movie_links::unlink_genre,
        // Actors
        people::list_actors,
        people::search_actors,
        people::get_actor,
        people::create_actor,
        people::update_actor,
        people::delete_actor,
        // Directors
        people::list_directors,
        people::search_directors,
        people::get_director,
        people::create_director,
        people::update_director,
        people::delete_director,
        // Genres
        lookups::list_genres,
        lookups::search_genres,
        lookups::get_genre,
        lookups::create_genre,
        lookups::update_genre,
        lookups::delete_genre,
        // Nationals
        lookups::list_nationals,
        lookups::search_nationals,
        lookups::get_national,
        lookups::create_national,
        lookups::update_national,
        lookups::delete_national,
        // Recommendations
        recommendations::list_recommendations,
        recommendations::recommend_movie,
        recommendations::remove_recommendation,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::AuthRequest,
            crate::models::user::Registered,
            crate::models::user::LoginResponse,
            crate::models::user::UserInfo,
            // Movies
            crate::models::movie::Movie,
            crate::models::movie::MovieRequest,
            crate::models::movie::MovieResponse,
            crate::models::movie::MovieCreated,
            movies::PosterUploaded,
            // Associations
            crate::models::association::MovieSummary,
            crate::models::association::LinkedActor,
            crate::models::association::LinkedDirector,
            crate::models::association::LinkedGenre,
            crate::models::association::MovieActors,
            crate::models::association::MovieDirectors,
            crate::models::association::MovieGenres,
            crate::models::association::LinkActorRequest,
            crate::models::association::UpdateActorRoleRequest,
            crate::models::association::LinkDirectorRequest,
            crate::models::association::GenreIdsRequest,
            crate::models::association::GenreDiff,
            crate::models::association::RecommendRequest,
            // People and lookups
            crate::models::person::Person,
            crate::models::person::PersonRequest,
            crate::models::lookup::Lookup,
            crate::models::lookup::LookupRequest,
            super::Created,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login and current user"),
        (name = "movies", description = "Movie management"),
        (name = "movie-links", description = "Actors, directors and genres of a movie"),
        (name = "actors", description = "Actor management"),
        (name = "directors", description = "Director management"),
        (name = "genres", description = "Genre management"),
        (name = "nationals", description = "National management"),
        (name = "recommendations", description = "Recommended movies")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
