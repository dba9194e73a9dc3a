//! In-memory backend
//!
//! Each unit of work operates on a snapshot of the whole state. A writing
//! commit replaces the shared state only if nothing else committed since the
//! snapshot was taken; otherwise it fails with `Conflict` and its writes are
//! discarded. Unique and reference constraints mirror the relational schema.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard,
};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        Credential, LinkedActor, LinkedDirector, LinkedGenre, Lookup, LookupKind, Movie, NewMovie,
        NewPerson, Person, PersonKind,
    },
};

use super::{
    people::capitalize, LookupsRepository, MovieActorsRepository, MovieDirectorsRepository,
    MovieGenresRepository, MoviesRepository, PeopleRepository, RecommendationsRepository, Store,
    UnitOfWork, UsersRepository,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    /// Bumped by every writing commit
    version: u64,
    sequences: BTreeMap<&'static str, i32>,
    nationals: BTreeMap<i32, Lookup>,
    genres: BTreeMap<i32, Lookup>,
    actors: BTreeMap<i32, Person>,
    directors: BTreeMap<i32, Person>,
    movies: BTreeMap<i32, Movie>,
    users: BTreeMap<i32, Credential>,
    movie_genres: BTreeSet<(i32, i32)>,
    movie_directors: BTreeSet<(i32, i32)>,
    movie_actors: BTreeMap<(i32, i32), String>,
    recommendations: Vec<i32>,
}

impl MemoryState {
    fn next_id(&mut self, table: &'static str) -> i32 {
        let id = self.sequences.entry(table).or_insert(0);
        *id += 1;
        *id
    }

    fn lookups(&self, kind: LookupKind) -> &BTreeMap<i32, Lookup> {
        match kind {
            LookupKind::Genre => &self.genres,
            LookupKind::National => &self.nationals,
        }
    }

    fn lookups_mut(&mut self, kind: LookupKind) -> &mut BTreeMap<i32, Lookup> {
        match kind {
            LookupKind::Genre => &mut self.genres,
            LookupKind::National => &mut self.nationals,
        }
    }

    fn people(&self, kind: PersonKind) -> &BTreeMap<i32, Person> {
        match kind {
            PersonKind::Actor => &self.actors,
            PersonKind::Director => &self.directors,
        }
    }

    fn people_mut(&mut self, kind: PersonKind) -> &mut BTreeMap<i32, Person> {
        match kind {
            PersonKind::Actor => &mut self.actors,
            PersonKind::Director => &mut self.directors,
        }
    }

    fn require_national(&self, national_id: i32) -> AppResult<()> {
        if self.nationals.contains_key(&national_id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("National with id {} not found", national_id)))
        }
    }

    fn require_movie(&self, movie_id: i32) -> AppResult<()> {
        if self.movies.contains_key(&movie_id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Movie with id {} not found", movie_id)))
        }
    }
}

/// Shared in-memory store; clones share the same state
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    writes: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of row writes committed so far
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let snapshot = self.lock().clone();
        Ok(Box::new(MemoryUnitOfWork {
            store: self.clone(),
            state: snapshot,
            writes: 0,
        }))
    }
}

pub struct MemoryUnitOfWork {
    store: MemoryStore,
    state: MemoryState,
    writes: u64,
}

impl MemoryUnitOfWork {
    fn wrote(&mut self, rows: u64) -> u64 {
        self.writes += rows;
        rows
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryUnitOfWork { store, mut state, writes } = *self;
        if writes == 0 {
            return Ok(());
        }

        let mut shared = store.lock();
        if shared.version != state.version {
            return Err(AppError::Conflict(
                "Concurrent transaction committed first; retry".to_string(),
            ));
        }
        state.version += 1;
        *shared = state;
        store.writes.fetch_add(writes, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl MoviesRepository for MemoryUnitOfWork {
    async fn movies_create(&mut self, movie: &NewMovie) -> AppResult<i32> {
        if self.state.movies.values().any(|m| m.title == movie.title) {
            return Err(AppError::Conflict("Movie already exists".to_string()));
        }
        self.state.require_national(movie.nationality_id)?;

        let id = self.state.next_id("movies");
        let now = Utc::now();
        self.state.movies.insert(
            id,
            Movie {
                id,
                title: movie.title.clone(),
                release_date: movie.release_date,
                duration: movie.duration,
                plot: movie.plot.clone(),
                poster_url: movie.poster_url.clone(),
                trailer_url: movie.trailer_url.clone(),
                language: movie.language.clone(),
                nationality_id: movie.nationality_id,
                created_at: now,
                updated_at: now,
            },
        );
        self.wrote(1);
        Ok(id)
    }

    async fn movies_update(&mut self, id: i32, movie: &NewMovie) -> AppResult<()> {
        if self.state.movies.values().any(|m| m.title == movie.title && m.id != id) {
            return Err(AppError::Conflict("Movie already exists".to_string()));
        }
        self.state.require_national(movie.nationality_id)?;

        let existing = self
            .state
            .movies
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Movie with id {} not found", id)))?;
        existing.title = movie.title.clone();
        existing.release_date = movie.release_date;
        existing.duration = movie.duration;
        existing.plot = movie.plot.clone();
        existing.poster_url = movie.poster_url.clone();
        existing.trailer_url = movie.trailer_url.clone();
        existing.language = movie.language.clone();
        existing.nationality_id = movie.nationality_id;
        existing.updated_at = Utc::now();
        self.wrote(1);
        Ok(())
    }

    async fn movies_set_poster_url(&mut self, id: i32, poster_url: &str) -> AppResult<()> {
        let existing = self
            .state
            .movies
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Movie with id {} not found", id)))?;
        existing.poster_url = poster_url.to_string();
        existing.updated_at = Utc::now();
        self.wrote(1);
        Ok(())
    }

    async fn movies_delete(&mut self, id: i32) -> AppResult<()> {
        let referenced = self.state.movie_genres.iter().any(|(m, _)| *m == id)
            || self.state.movie_directors.iter().any(|(m, _)| *m == id)
            || self.state.movie_actors.keys().any(|(m, _)| *m == id)
            || self.state.recommendations.contains(&id);
        if referenced {
            return Err(AppError::Conflict(format!("Movie {} is still referenced", id)));
        }
        self.state
            .movies
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Movie with id {} not found", id)))?;
        self.wrote(1);
        Ok(())
    }

    async fn movies_get_by_id(&mut self, id: i32) -> AppResult<Option<Movie>> {
        Ok(self.state.movies.get(&id).cloned())
    }

    async fn movies_get_by_title(&mut self, title: &str) -> AppResult<Option<Movie>> {
        Ok(self.state.movies.values().find(|m| m.title == title).cloned())
    }

    async fn movies_list(&mut self) -> AppResult<Vec<Movie>> {
        Ok(self.state.movies.values().cloned().collect())
    }

    async fn movies_list_by_genre(&mut self, genre_id: i32) -> AppResult<Vec<Movie>> {
        let mut movies: Vec<Movie> = self
            .state
            .movie_genres
            .iter()
            .filter(|(_, g)| *g == genre_id)
            .filter_map(|(m, _)| self.state.movies.get(m).cloned())
            .collect();
        movies.sort_by_key(|m| m.id);
        Ok(movies)
    }
}

#[async_trait]
impl PeopleRepository for MemoryUnitOfWork {
    async fn people_create(&mut self, kind: PersonKind, person: &NewPerson) -> AppResult<i32> {
        if self.state.people(kind).values().any(|p| p.name == person.name) {
            return Err(AppError::Conflict(format!("{} already exists", capitalize(kind.label()))));
        }
        self.state.require_national(person.nationality_id)?;

        let id = self.state.next_id(kind.table());
        let now = Utc::now();
        self.state.people_mut(kind).insert(
            id,
            Person {
                id,
                name: person.name.clone(),
                date_of_birth: person.date_of_birth,
                nationality_id: person.nationality_id,
                created_at: now,
                updated_at: now,
            },
        );
        self.wrote(1);
        Ok(id)
    }

    async fn people_update(&mut self, kind: PersonKind, id: i32, person: &NewPerson) -> AppResult<()> {
        if self.state.people(kind).values().any(|p| p.name == person.name && p.id != id) {
            return Err(AppError::Conflict(format!("{} already exists", capitalize(kind.label()))));
        }
        self.state.require_national(person.nationality_id)?;

        let existing = self.state.people_mut(kind).get_mut(&id).ok_or_else(|| {
            AppError::NotFound(format!("{} with id {} not found", capitalize(kind.label()), id))
        })?;
        existing.name = person.name.clone();
        existing.date_of_birth = person.date_of_birth;
        existing.nationality_id = person.nationality_id;
        existing.updated_at = Utc::now();
        self.wrote(1);
        Ok(())
    }

    async fn people_delete(&mut self, kind: PersonKind, id: i32) -> AppResult<()> {
        let referenced = match kind {
            PersonKind::Actor => self.state.movie_actors.keys().any(|(_, a)| *a == id),
            PersonKind::Director => self.state.movie_directors.iter().any(|(_, d)| *d == id),
        };
        if referenced {
            return Err(AppError::Conflict(format!(
                "{} {} is still linked to a movie",
                capitalize(kind.label()),
                id
            )));
        }
        self.state.people_mut(kind).remove(&id).ok_or_else(|| {
            AppError::NotFound(format!("{} with id {} not found", capitalize(kind.label()), id))
        })?;
        self.wrote(1);
        Ok(())
    }

    async fn people_get_by_id(&mut self, kind: PersonKind, id: i32) -> AppResult<Option<Person>> {
        Ok(self.state.people(kind).get(&id).cloned())
    }

    async fn people_get_by_name(&mut self, kind: PersonKind, name: &str) -> AppResult<Option<Person>> {
        Ok(self.state.people(kind).values().find(|p| p.name == name).cloned())
    }

    async fn people_list(&mut self, kind: PersonKind, national_id: Option<i32>) -> AppResult<Vec<Person>> {
        Ok(self
            .state
            .people(kind)
            .values()
            .filter(|p| national_id.map_or(true, |n| p.nationality_id == n))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LookupsRepository for MemoryUnitOfWork {
    async fn lookups_create(&mut self, kind: LookupKind, name: &str) -> AppResult<i32> {
        if self.state.lookups(kind).values().any(|l| l.name == name) {
            return Err(AppError::Conflict(format!("{} already exists", capitalize(kind.label()))));
        }

        let id = self.state.next_id(kind.table());
        let now = Utc::now();
        self.state.lookups_mut(kind).insert(
            id,
            Lookup {
                id,
                name: name.to_string(),
                created_at: now,
                updated_at: now,
            },
        );
        self.wrote(1);
        Ok(id)
    }

    async fn lookups_update(&mut self, kind: LookupKind, id: i32, name: &str) -> AppResult<()> {
        if self.state.lookups(kind).values().any(|l| l.name == name && l.id != id) {
            return Err(AppError::Conflict(format!("{} already exists", capitalize(kind.label()))));
        }
        let existing = self.state.lookups_mut(kind).get_mut(&id).ok_or_else(|| {
            AppError::NotFound(format!("{} with id {} not found", capitalize(kind.label()), id))
        })?;
        existing.name = name.to_string();
        existing.updated_at = Utc::now();
        self.wrote(1);
        Ok(())
    }

    async fn lookups_delete(&mut self, kind: LookupKind, id: i32) -> AppResult<()> {
        let referenced = match kind {
            LookupKind::Genre => self.state.movie_genres.iter().any(|(_, g)| *g == id),
            LookupKind::National => self.lookups_national_in_use(id).await?,
        };
        if referenced {
            return Err(AppError::Conflict(format!(
                "{} {} is still referenced",
                capitalize(kind.label()),
                id
            )));
        }
        self.state.lookups_mut(kind).remove(&id).ok_or_else(|| {
            AppError::NotFound(format!("{} with id {} not found", capitalize(kind.label()), id))
        })?;
        self.wrote(1);
        Ok(())
    }

    async fn lookups_get_by_id(&mut self, kind: LookupKind, id: i32) -> AppResult<Option<Lookup>> {
        Ok(self.state.lookups(kind).get(&id).cloned())
    }

    async fn lookups_get_by_name(&mut self, kind: LookupKind, name: &str) -> AppResult<Option<Lookup>> {
        Ok(self.state.lookups(kind).values().find(|l| l.name == name).cloned())
    }

    async fn lookups_list(&mut self, kind: LookupKind) -> AppResult<Vec<Lookup>> {
        Ok(self.state.lookups(kind).values().cloned().collect())
    }

    async fn lookups_national_in_use(&mut self, national_id: i32) -> AppResult<bool> {
        Ok(self.state.movies.values().any(|m| m.nationality_id == national_id)
            || self.state.actors.values().any(|p| p.nationality_id == national_id)
            || self.state.directors.values().any(|p| p.nationality_id == national_id))
    }
}

#[async_trait]
impl UsersRepository for MemoryUnitOfWork {
    async fn users_create(&mut self, username: &str, password_hash: &str, role: &str) -> AppResult<i32> {
        if self.state.users.values().any(|u| u.username == username) {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        let id = self.state.next_id("users");
        self.state.users.insert(
            id,
            Credential {
                id,
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                role: role.to_string(),
            },
        );
        self.wrote(1);
        Ok(id)
    }

    async fn users_get_by_username(&mut self, username: &str) -> AppResult<Option<Credential>> {
        Ok(self.state.users.values().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl MovieGenresRepository for MemoryUnitOfWork {
    async fn movie_genres_insert(&mut self, movie_id: i32, genre_id: i32) -> AppResult<()> {
        self.state.require_movie(movie_id)?;
        if !self.state.genres.contains_key(&genre_id) {
            return Err(AppError::NotFound(format!("Genre with id {} not found", genre_id)));
        }
        if !self.state.movie_genres.insert((movie_id, genre_id)) {
            return Err(AppError::Conflict("Movie genre link already exists".to_string()));
        }
        self.wrote(1);
        Ok(())
    }

    async fn movie_genres_delete(&mut self, movie_id: i32, genre_id: i32) -> AppResult<u64> {
        let removed = self.state.movie_genres.remove(&(movie_id, genre_id)) as u64;
        Ok(self.wrote(removed))
    }

    async fn movie_genres_list(&mut self, movie_id: i32) -> AppResult<Vec<LinkedGenre>> {
        Ok(self
            .state
            .movie_genres
            .iter()
            .filter(|(m, _)| *m == movie_id)
            .filter_map(|(_, g)| {
                self.state.genres.get(g).map(|genre| LinkedGenre {
                    genre_id: genre.id,
                    name: genre.name.clone(),
                })
            })
            .collect())
    }

    async fn movie_genres_delete_by_movie(&mut self, movie_id: i32) -> AppResult<u64> {
        let before = self.state.movie_genres.len();
        self.state.movie_genres.retain(|(m, _)| *m != movie_id);
        let removed = (before - self.state.movie_genres.len()) as u64;
        Ok(self.wrote(removed))
    }

    async fn movie_genres_delete_by_genre(&mut self, genre_id: i32) -> AppResult<u64> {
        let before = self.state.movie_genres.len();
        self.state.movie_genres.retain(|(_, g)| *g != genre_id);
        let removed = (before - self.state.movie_genres.len()) as u64;
        Ok(self.wrote(removed))
    }
}

#[async_trait]
impl MovieDirectorsRepository for MemoryUnitOfWork {
    async fn movie_directors_insert(&mut self, movie_id: i32, director_id: i32) -> AppResult<()> {
        self.state.require_movie(movie_id)?;
        if !self.state.directors.contains_key(&director_id) {
            return Err(AppError::NotFound(format!("Director with id {} not found", director_id)));
        }
        if !self.state.movie_directors.insert((movie_id, director_id)) {
            return Err(AppError::Conflict("Movie director link already exists".to_string()));
        }
        self.wrote(1);
        Ok(())
    }

    async fn movie_directors_delete(&mut self, movie_id: i32, director_id: i32) -> AppResult<u64> {
        let removed = self.state.movie_directors.remove(&(movie_id, director_id)) as u64;
        Ok(self.wrote(removed))
    }

    async fn movie_directors_exists(&mut self, movie_id: i32, director_id: i32) -> AppResult<bool> {
        Ok(self.state.movie_directors.contains(&(movie_id, director_id)))
    }

    async fn movie_directors_list(&mut self, movie_id: i32) -> AppResult<Vec<LinkedDirector>> {
        Ok(self
            .state
            .movie_directors
            .iter()
            .filter(|(m, _)| *m == movie_id)
            .filter_map(|(_, d)| {
                self.state.directors.get(d).map(|director| LinkedDirector {
                    director_id: director.id,
                    name: director.name.clone(),
                    date_of_birth: director.date_of_birth,
                })
            })
            .collect())
    }

    async fn movie_directors_delete_by_movie(&mut self, movie_id: i32) -> AppResult<u64> {
        let before = self.state.movie_directors.len();
        self.state.movie_directors.retain(|(m, _)| *m != movie_id);
        let removed = (before - self.state.movie_directors.len()) as u64;
        Ok(self.wrote(removed))
    }

    async fn movie_directors_delete_by_director(&mut self, director_id: i32) -> AppResult<u64> {
        let before = self.state.movie_directors.len();
        self.state.movie_directors.retain(|(_, d)| *d != director_id);
        let removed = (before - self.state.movie_directors.len()) as u64;
        Ok(self.wrote(removed))
    }
}

#[async_trait]
impl MovieActorsRepository for MemoryUnitOfWork {
    async fn movie_actors_insert(&mut self, movie_id: i32, actor_id: i32, role: &str) -> AppResult<()> {
        self.state.require_movie(movie_id)?;
        if !self.state.actors.contains_key(&actor_id) {
            return Err(AppError::NotFound(format!("Actor with id {} not found", actor_id)));
        }
        if self.state.movie_actors.contains_key(&(movie_id, actor_id)) {
            return Err(AppError::Conflict("Movie actor link already exists".to_string()));
        }
        self.state.movie_actors.insert((movie_id, actor_id), role.to_string());
        self.wrote(1);
        Ok(())
    }

    async fn movie_actors_update_role(&mut self, movie_id: i32, actor_id: i32, role: &str) -> AppResult<u64> {
        match self.state.movie_actors.get_mut(&(movie_id, actor_id)) {
            Some(existing) => {
                *existing = role.to_string();
                Ok(self.wrote(1))
            }
            None => Ok(0),
        }
    }

    async fn movie_actors_delete(&mut self, movie_id: i32, actor_id: i32) -> AppResult<u64> {
        let removed = self.state.movie_actors.remove(&(movie_id, actor_id)).is_some() as u64;
        Ok(self.wrote(removed))
    }

    async fn movie_actors_exists(&mut self, movie_id: i32, actor_id: i32) -> AppResult<bool> {
        Ok(self.state.movie_actors.contains_key(&(movie_id, actor_id)))
    }

    async fn movie_actors_list(&mut self, movie_id: i32) -> AppResult<Vec<LinkedActor>> {
        Ok(self
            .state
            .movie_actors
            .iter()
            .filter(|((m, _), _)| *m == movie_id)
            .filter_map(|((_, a), role)| {
                self.state.actors.get(a).map(|actor| LinkedActor {
                    actor_id: actor.id,
                    name: actor.name.clone(),
                    date_of_birth: actor.date_of_birth,
                    role: role.clone(),
                })
            })
            .collect())
    }

    async fn movie_actors_delete_by_movie(&mut self, movie_id: i32) -> AppResult<u64> {
        let before = self.state.movie_actors.len();
        self.state.movie_actors.retain(|(m, _), _| *m != movie_id);
        let removed = (before - self.state.movie_actors.len()) as u64;
        Ok(self.wrote(removed))
    }

    async fn movie_actors_delete_by_actor(&mut self, actor_id: i32) -> AppResult<u64> {
        let before = self.state.movie_actors.len();
        self.state.movie_actors.retain(|(_, a), _| *a != actor_id);
        let removed = (before - self.state.movie_actors.len()) as u64;
        Ok(self.wrote(removed))
    }
}

#[async_trait]
impl RecommendationsRepository for MemoryUnitOfWork {
    async fn recommendations_insert(&mut self, movie_id: i32) -> AppResult<()> {
        self.state.require_movie(movie_id)?;
        if self.state.recommendations.contains(&movie_id) {
            return Err(AppError::Conflict("Recommendation already exists".to_string()));
        }
        self.state.recommendations.push(movie_id);
        self.wrote(1);
        Ok(())
    }

    async fn recommendations_delete(&mut self, movie_id: i32) -> AppResult<u64> {
        let before = self.state.recommendations.len();
        self.state.recommendations.retain(|m| *m != movie_id);
        let removed = (before - self.state.recommendations.len()) as u64;
        Ok(self.wrote(removed))
    }

    async fn recommendations_exists(&mut self, movie_id: i32) -> AppResult<bool> {
        Ok(self.state.recommendations.contains(&movie_id))
    }

    async fn recommendations_list(&mut self) -> AppResult<Vec<Movie>> {
        Ok(self
            .state
            .recommendations
            .iter()
            .rev()
            .filter_map(|id| self.state.movies.get(id).cloned())
            .collect())
    }
}
