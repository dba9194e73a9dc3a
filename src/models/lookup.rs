//! Genres and nationals: entities that are only a unique name

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LookupKind {
    Genre,
    National,
}

impl LookupKind {
    pub fn table(&self) -> &'static str {
        match self {
            LookupKind::Genre => "genres",
            LookupKind::National => "national",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LookupKind::Genre => "genre",
            LookupKind::National => "national",
        }
    }
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lookup {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create / update genre or national request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LookupRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
}

/// `?name=` search
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct NameQuery {
    pub name: Option<String>,
}
