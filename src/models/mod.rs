//! Data models for eFilm

pub mod association;
pub mod lookup;
pub mod movie;
pub mod person;
pub mod user;

use chrono::NaiveDate;

use crate::error::{AppError, AppResult};

// Re-export commonly used types
pub use association::{LinkedActor, LinkedDirector, LinkedGenre, MovieSummary};
pub use lookup::{Lookup, LookupKind};
pub use movie::{Movie, MovieResponse, NewMovie};
pub use person::{NewPerson, Person, PersonKind};
pub use user::{Credential, UserClaims};

/// Wire format of every calendar date in requests and responses
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date; unpadded or signed components are rejected
pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    let trimmed = value.trim();
    let invalid = || AppError::InvalidDate(value.to_string());

    let bytes = trimmed.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| invalid())
}
