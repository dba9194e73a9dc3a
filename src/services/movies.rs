//! Movie aggregate: scalar fields, genre membership and poster

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{movie::MovieRequest, LookupKind, MovieResponse},
    repository::{Store, Transaction},
};

use super::{
    movie_genres::MovieGenresService, movie_view, movie_views, require_lookup, require_movie,
    storage::ObjectStore,
};

/// Content types accepted for posters
pub const POSTER_CONTENT_TYPES: [&str; 3] = ["image/png", "image/jpg", "image/jpeg"];

/// Object key of a movie poster: `images/movies/<title>.<subtype>`
pub fn poster_key(title: &str, content_type: &str) -> String {
    let extension = content_type.rsplit('/').next().unwrap_or(content_type);
    let name: String = title
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("images/movies/{}.{}", name, extension)
}

#[derive(Clone)]
pub struct MoviesService {
    store: Arc<dyn Store>,
    genres: MovieGenresService,
    objects: Arc<dyn ObjectStore>,
}

impl MoviesService {
    pub fn new(store: Arc<dyn Store>, genres: MovieGenresService, objects: Arc<dyn ObjectStore>) -> Self {
        Self { store, genres, objects }
    }

    /// Create a movie and its genre links in one transaction
    pub async fn create(&self, request: &MovieRequest) -> AppResult<i32> {
        let mut tx = Transaction::begin(self.store.as_ref(), "movies.create").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            if uow.movies_get_by_title(request.title.trim()).await?.is_some() {
                return Err(AppError::Conflict("Movie title already exists".to_string()));
            }
            let movie = request.to_new_movie()?;
            require_lookup(uow, LookupKind::National, movie.nationality_id).await?;

            let movie_id = uow.movies_create(&movie).await?;
            self.genres.reconcile(uow, movie_id, &request.genre_ids).await?;
            Ok(movie_id)
        }
        .await;
        let movie_id = tx.finish(result).await?;

        tracing::info!(movie_id, title = %request.title.trim(), "movie created");
        Ok(movie_id)
    }

    /// Replace scalar fields and reconcile genres in one transaction
    pub async fn update(&self, movie_id: i32, request: &MovieRequest) -> AppResult<()> {
        let mut tx = Transaction::begin(self.store.as_ref(), "movies.update").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            require_movie(uow, movie_id).await?;
            if let Some(other) = uow.movies_get_by_title(request.title.trim()).await? {
                if other.id != movie_id {
                    return Err(AppError::Conflict("Movie title already exists".to_string()));
                }
            }
            let movie = request.to_new_movie()?;
            require_lookup(uow, LookupKind::National, movie.nationality_id).await?;

            let diff = self.genres.reconcile(uow, movie_id, &request.genre_ids).await?;
            uow.movies_update(movie_id, &movie).await?;
            Ok(diff)
        }
        .await;
        let diff = tx.finish(result).await?;

        tracing::info!(movie_id, added = ?diff.added, removed = ?diff.removed, "movie updated");
        Ok(())
    }

    /// Delete a movie after its actor, director and genre links and its
    /// recommendation, in one transaction
    pub async fn delete(&self, movie_id: i32) -> AppResult<()> {
        let mut tx = Transaction::begin(self.store.as_ref(), "movies.delete").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            require_movie(uow, movie_id).await?;
            let actors = uow.movie_actors_delete_by_movie(movie_id).await?;
            let directors = uow.movie_directors_delete_by_movie(movie_id).await?;
            let genres = uow.movie_genres_delete_by_movie(movie_id).await?;
            uow.recommendations_delete(movie_id).await?;
            uow.movies_delete(movie_id).await?;
            Ok((actors, directors, genres))
        }
        .await;
        let (actors, directors, genres) = tx.finish(result).await?;

        tracing::info!(movie_id, actors, directors, genres, "movie deleted");
        Ok(())
    }

    /// Store a poster image and point the movie at it
    pub async fn upload_poster(&self, movie_id: i32, bytes: Vec<u8>, content_type: &str) -> AppResult<String> {
        let content_type = content_type.trim().to_ascii_lowercase();
        if !POSTER_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::UnsupportedMediaType(format!(
                "Poster must be one of {}",
                POSTER_CONTENT_TYPES.join(", ")
            )));
        }

        let mut tx = Transaction::begin(self.store.as_ref(), "movies.upload_poster").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            let movie = require_movie(uow, movie_id).await?;
            let key = poster_key(&movie.title, &content_type);
            let url = self.objects.put(&key, bytes, &content_type).await?;
            uow.movies_set_poster_url(movie_id, &url).await?;
            Ok(url)
        }
        .await;
        let url = tx.finish(result).await?;

        tracing::info!(movie_id, url = %url, "poster uploaded");
        Ok(url)
    }

    pub async fn find_by_id(&self, movie_id: i32) -> AppResult<MovieResponse> {
        let mut tx = Transaction::begin(self.store.as_ref(), "movies.get").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            let movie = require_movie(uow, movie_id).await?;
            movie_view(uow, movie).await
        }
        .await;
        tx.finish(result).await
    }

    pub async fn find_by_title(&self, title: &str) -> AppResult<Option<MovieResponse>> {
        let mut tx = Transaction::begin(self.store.as_ref(), "movies.get_by_title").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            match uow.movies_get_by_title(title.trim()).await? {
                Some(movie) => Ok(Some(movie_view(uow, movie).await?)),
                None => Ok(None),
            }
        }
        .await;
        tx.finish(result).await
    }

    pub async fn find_all(&self) -> AppResult<Vec<MovieResponse>> {
        let mut tx = Transaction::begin(self.store.as_ref(), "movies.list").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            let movies = uow.movies_list().await?;
            movie_views(uow, movies).await
        }
        .await;
        tx.finish(result).await
    }

    /// Movies of a genre; an unknown genre is `NotFound`
    pub async fn find_all_by_genre(&self, genre_id: i32) -> AppResult<Vec<MovieResponse>> {
        let mut tx = Transaction::begin(self.store.as_ref(), "movies.list_by_genre").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            require_lookup(uow, LookupKind::Genre, genre_id).await?;
            let movies = uow.movies_list_by_genre(genre_id).await?;
            movie_views(uow, movies).await
        }
        .await;
        tx.finish(result).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{NewPerson, PersonKind},
        repository::MemoryStore,
        services::{fixtures, storage::MockObjectStore},
    };
    use chrono::NaiveDate;

    struct Harness {
        memory: MemoryStore,
        store: Arc<dyn Store>,
        service: MoviesService,
        korea: i32,
        genres: Vec<i32>,
    }

    async fn harness(objects: MockObjectStore) -> Harness {
        let (memory, store) = fixtures::store();
        let korea = fixtures::lookup(&store, LookupKind::National, "Korea").await;
        let mut genres = Vec::new();
        for name in ["Drama", "Thriller", "Comedy"] {
            genres.push(fixtures::lookup(&store, LookupKind::Genre, name).await);
        }
        let service = MoviesService::new(
            store.clone(),
            MovieGenresService::new(store.clone()),
            Arc::new(objects),
        );
        Harness {
            memory,
            store,
            service,
            korea,
            genres,
        }
    }

    #[test]
    fn test_poster_key() {
        assert_eq!(poster_key("Parasite", "image/png"), "images/movies/Parasite.png");
        assert_eq!(poster_key("AC/DC: Live", "image/jpeg"), "images/movies/AC_DC: Live.jpeg");
        assert_eq!(poster_key("a\\b", "image/jpg"), "images/movies/a_b.jpg");
    }

    #[tokio::test]
    async fn test_parasite_genres_follow_updates() {
        let h = harness(MockObjectStore::new()).await;
        let (g1, g2, g3) = (h.genres[0], h.genres[1], h.genres[2]);

        let request = fixtures::movie_request("Parasite", h.korea, vec![g1, g2]);
        let movie_id = h.service.create(&request).await.unwrap();

        let movie = h.service.find_by_id(movie_id).await.unwrap();
        assert_eq!(movie.title, "Parasite");
        assert_eq!(movie.release_date.to_string(), "2019-05-30");
        assert_eq!(movie.genre_ids, vec![g1, g2]);

        let request = fixtures::movie_request("Parasite", h.korea, vec![g2, g3]);
        h.service.update(movie_id, &request).await.unwrap();

        let movie = h.service.find_by_id(movie_id).await.unwrap();
        assert_eq!(movie.genre_ids, vec![g2, g3]);
    }

    #[tokio::test]
    async fn test_create_duplicate_title() {
        let h = harness(MockObjectStore::new()).await;
        let request = fixtures::movie_request("Parasite", h.korea, vec![]);
        h.service.create(&request).await.unwrap();

        let err = h.service.create(&request).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_bad_date_inserts_nothing() {
        let h = harness(MockObjectStore::new()).await;
        let writes = h.memory.write_count();
        let mut request = fixtures::movie_request("Parasite", h.korea, vec![h.genres[0]]);
        request.release_date = "13-01-2024".to_string();

        let err = h.service.create(&request).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidDate(_)));
        assert!(h.service.find_all().await.unwrap().is_empty());
        assert_eq!(h.memory.write_count(), writes);
    }

    #[tokio::test]
    async fn test_create_unknown_genre_rolls_back_movie() {
        let h = harness(MockObjectStore::new()).await;
        let request = fixtures::movie_request("Parasite", h.korea, vec![h.genres[0], 999]);

        let err = h.service.create(&request).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(h.service.find_by_title("Parasite").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_unknown_national() {
        let h = harness(MockObjectStore::new()).await;
        let request = fixtures::movie_request("Parasite", 999, vec![]);

        let err = h.service.create(&request).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_missing_and_conflicting() {
        let h = harness(MockObjectStore::new()).await;
        h.service
            .create(&fixtures::movie_request("Parasite", h.korea, vec![]))
            .await
            .unwrap();
        let okja = h
            .service
            .create(&fixtures::movie_request("Okja", h.korea, vec![]))
            .await
            .unwrap();

        let err = h
            .service
            .update(404, &fixtures::movie_request("Mother", h.korea, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = h
            .service
            .update(okja, &fixtures::movie_request("Parasite", h.korea, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let mut request = fixtures::movie_request("Okja", h.korea, vec![]);
        request.release_date = "2017/06/28".to_string();
        let err = h.service.update(okja, &request).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidDate(_)));
    }

    #[tokio::test]
    async fn test_delete_leaves_no_orphan_links() {
        let h = harness(MockObjectStore::new()).await;
        let movie_id = h
            .service
            .create(&fixtures::movie_request("Parasite", h.korea, h.genres.clone()))
            .await
            .unwrap();

        let mut tx = Transaction::begin(h.store.as_ref(), "fixture").await.unwrap();
        let seeded: AppResult<()> = async {
            let uow = tx.uow();
            for name in ["Bong Joon-ho", "Han Jin-won"] {
                let person = NewPerson {
                    name: name.to_string(),
                    date_of_birth: NaiveDate::from_ymd_opt(1969, 9, 14).unwrap(),
                    nationality_id: h.korea,
                };
                let director = uow.people_create(PersonKind::Director, &person).await?;
                uow.movie_directors_insert(movie_id, director).await?;
            }
            let actor = uow
                .people_create(
                    PersonKind::Actor,
                    &NewPerson {
                        name: "Song Kang-ho".to_string(),
                        date_of_birth: NaiveDate::from_ymd_opt(1967, 1, 17).unwrap(),
                        nationality_id: h.korea,
                    },
                )
                .await?;
            uow.movie_actors_insert(movie_id, actor, "Kim Ki-taek").await?;
            uow.recommendations_insert(movie_id).await
        }
        .await;
        tx.finish(seeded).await.unwrap();

        h.service.delete(movie_id).await.unwrap();

        let mut uow = h.store.begin().await.unwrap();
        assert!(uow.movie_genres_list(movie_id).await.unwrap().is_empty());
        assert!(uow.movie_directors_list(movie_id).await.unwrap().is_empty());
        assert!(uow.movie_actors_list(movie_id).await.unwrap().is_empty());
        assert!(!uow.recommendations_exists(movie_id).await.unwrap());
        assert!(uow.movies_get_by_id(movie_id).await.unwrap().is_none());

        let err = h.service.delete(movie_id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_upload_poster_stores_and_updates_url() {
        let mut objects = MockObjectStore::new();
        objects
            .expect_put()
            .withf(|key, bytes, content_type| {
                key == "images/movies/Parasite.png" && *bytes == [137u8, 80, 78, 71] && content_type == "image/png"
            })
            .times(1)
            .returning(|key, _, _| Ok(format!("http://cdn/efilm/{}", key)));
        let h = harness(objects).await;
        let movie_id = h
            .service
            .create(&fixtures::movie_request("Parasite", h.korea, vec![]))
            .await
            .unwrap();

        let url = h
            .service
            .upload_poster(movie_id, vec![137, 80, 78, 71], "image/png")
            .await
            .unwrap();

        assert_eq!(url, "http://cdn/efilm/images/movies/Parasite.png");
        assert_eq!(h.service.find_by_id(movie_id).await.unwrap().poster_url, url);
    }

    #[tokio::test]
    async fn test_upload_poster_rejects_other_types() {
        let mut objects = MockObjectStore::new();
        objects.expect_put().never();
        let h = harness(objects).await;
        let movie_id = h
            .service
            .create(&fixtures::movie_request("Parasite", h.korea, vec![]))
            .await
            .unwrap();

        let err = h
            .service
            .upload_poster(movie_id, vec![0], "image/gif")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
    }

    #[tokio::test]
    async fn test_upload_poster_storage_failure_keeps_old_url() {
        let mut objects = MockObjectStore::new();
        objects
            .expect_put()
            .returning(|_, _, _| Err(AppError::Storage("bucket unavailable".to_string())));
        let h = harness(objects).await;
        let mut request = fixtures::movie_request("Parasite", h.korea, vec![]);
        request.poster_url = "http://old/poster.png".to_string();
        let movie_id = h.service.create(&request).await.unwrap();

        let err = h
            .service
            .upload_poster(movie_id, vec![1], "image/jpeg")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(
            h.service.find_by_id(movie_id).await.unwrap().poster_url,
            "http://old/poster.png"
        );
    }

    #[tokio::test]
    async fn test_find_all_by_genre() {
        let h = harness(MockObjectStore::new()).await;
        let (g1, g2) = (h.genres[0], h.genres[1]);
        h.service
            .create(&fixtures::movie_request("Parasite", h.korea, vec![g1, g2]))
            .await
            .unwrap();
        h.service
            .create(&fixtures::movie_request("Okja", h.korea, vec![g2]))
            .await
            .unwrap();

        let titles: Vec<String> = h
            .service
            .find_all_by_genre(g2)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, vec!["Parasite", "Okja"]);
        assert_eq!(h.service.find_all_by_genre(g1).await.unwrap().len(), 1);

        let err = h.service.find_all_by_genre(999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
