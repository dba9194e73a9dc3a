//! Actors and directors
//!
//! Both are stored with the same shape in their own table; [`PersonKind`]
//! selects which one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};

use super::parse_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PersonKind {
    Actor,
    Director,
}

impl PersonKind {
    pub fn table(&self) -> &'static str {
        match self {
            PersonKind::Actor => "actors",
            PersonKind::Director => "directors",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PersonKind::Actor => "actor",
            PersonKind::Director => "director",
        }
    }
}

impl std::fmt::Display for PersonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Actor or director row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Person {
    pub id: i32,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub nationality_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPerson {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub nationality_id: i32,
}

/// Create / update actor or director request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PersonRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    /// Date of birth, `YYYY-MM-DD`
    pub date_of_birth: String,
    pub nationality_id: i32,
}

impl PersonRequest {
    pub fn to_new_person(&self) -> AppResult<NewPerson> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        Ok(NewPerson {
            name: name.to_string(),
            date_of_birth: parse_date(&self.date_of_birth)?,
            nationality_id: self.nationality_id,
        })
    }
}

/// Listing filter
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct PersonQuery {
    pub national_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str) -> PersonRequest {
        PersonRequest {
            name: name.to_string(),
            date_of_birth: "1977-05-25".to_string(),
            nationality_id: 1,
        }
    }

    #[test]
    fn test_to_new_person_trims_name() {
        let person = request("  song kang-ho ").to_new_person().unwrap();
        assert_eq!(person.name, "song kang-ho");
        assert_eq!(person.date_of_birth, NaiveDate::from_ymd_opt(1977, 5, 25).unwrap());
    }

    #[test]
    fn test_to_new_person_rejects_blank_name() {
        assert!(matches!(request("   ").to_new_person(), Err(AppError::Validation(_))));
    }
}
