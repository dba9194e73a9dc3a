//! Actors and directors repository

use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    models::{NewPerson, Person, PersonKind},
};

use super::postgres::{map_delete_error, map_write_error, PgUnitOfWork};

#[async_trait]
pub trait PeopleRepository: Send {
    async fn people_create(&mut self, kind: PersonKind, person: &NewPerson) -> AppResult<i32>;

    async fn people_update(&mut self, kind: PersonKind, id: i32, person: &NewPerson) -> AppResult<()>;

    async fn people_delete(&mut self, kind: PersonKind, id: i32) -> AppResult<()>;

    async fn people_get_by_id(&mut self, kind: PersonKind, id: i32) -> AppResult<Option<Person>>;

    async fn people_get_by_name(&mut self, kind: PersonKind, name: &str) -> AppResult<Option<Person>>;

    /// All people of a kind, optionally restricted to one nationality
    async fn people_list(&mut self, kind: PersonKind, national_id: Option<i32>) -> AppResult<Vec<Person>>;
}

fn not_found(kind: PersonKind, id: i32) -> AppError {
    AppError::NotFound(format!("{} with id {} not found", capitalize(kind.label()), id))
}

pub(crate) fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[async_trait]
impl PeopleRepository for PgUnitOfWork {
    async fn people_create(&mut self, kind: PersonKind, person: &NewPerson) -> AppResult<i32> {
        let sql = format!(
            "INSERT INTO {} (name, date_of_birth, nationality_id, created_at, updated_at) \
             VALUES ($1, $2, $3, NOW(), NOW()) RETURNING id",
            kind.table()
        );
        let id: i32 = sqlx::query_scalar(&sql)
            .bind(&person.name)
            .bind(person.date_of_birth)
            .bind(person.nationality_id)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| map_write_error(e, &capitalize(kind.label())))?;
        Ok(id)
    }

    async fn people_update(&mut self, kind: PersonKind, id: i32, person: &NewPerson) -> AppResult<()> {
        let sql = format!(
            "UPDATE {} SET name = $1, date_of_birth = $2, nationality_id = $3, updated_at = NOW() \
             WHERE id = $4",
            kind.table()
        );
        let result = sqlx::query(&sql)
            .bind(&person.name)
            .bind(person.date_of_birth)
            .bind(person.nationality_id)
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_write_error(e, &capitalize(kind.label())))?;

        if result.rows_affected() == 0 {
            return Err(not_found(kind, id));
        }
        Ok(())
    }

    async fn people_delete(&mut self, kind: PersonKind, id: i32) -> AppResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_delete_error(e, &capitalize(kind.label())))?;

        if result.rows_affected() == 0 {
            return Err(not_found(kind, id));
        }
        Ok(())
    }

    async fn people_get_by_id(&mut self, kind: PersonKind, id: i32) -> AppResult<Option<Person>> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", kind.table());
        let person = sqlx::query_as::<_, Person>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(person)
    }

    async fn people_get_by_name(&mut self, kind: PersonKind, name: &str) -> AppResult<Option<Person>> {
        let sql = format!("SELECT * FROM {} WHERE name = $1", kind.table());
        let person = sqlx::query_as::<_, Person>(&sql)
            .bind(name)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(person)
    }

    async fn people_list(&mut self, kind: PersonKind, national_id: Option<i32>) -> AppResult<Vec<Person>> {
        let people = if let Some(national_id) = national_id {
            let sql = format!("SELECT * FROM {} WHERE nationality_id = $1 ORDER BY id", kind.table());
            sqlx::query_as::<_, Person>(&sql)
                .bind(national_id)
                .fetch_all(&mut *self.tx)
                .await?
        } else {
            let sql = format!("SELECT * FROM {} ORDER BY id", kind.table());
            sqlx::query_as::<_, Person>(&sql).fetch_all(&mut *self.tx).await?
        };
        Ok(people)
    }
}
