use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{favourite, visited};
use crate::error::AppError;

const COUNTRY_NAME_MAX: usize = 128;

/// Body of both add and rename.
#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    pub country_name: String,
}

/// One row of a personal list, shared by the visited and favourite lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub id: i32,
    pub country_name: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<visited::Model> for ListEntry {
    fn from(m: visited::Model) -> Self {
        Self {
            id: m.id,
            country_name: m.country_name,
            user_id: m.user_id,
            created_at: m.created_at,
        }
    }
}

impl From<favourite::Model> for ListEntry {
    fn from(m: favourite::Model) -> Self {
        Self {
            id: m.id,
            country_name: m.country_name,
            user_id: m.user_id,
            created_at: m.created_at,
        }
    }
}

/// Trim and collapse inner whitespace runs to a single space.
///
/// Case is preserved: "poland" and "Poland" are different entries.
pub fn normalize_country_name(raw: &str) -> Result<String, AppError> {
    let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() || name.chars().count() > COUNTRY_NAME_MAX {
        return Err(AppError::Validation(format!(
            "Country name must be 1-{COUNTRY_NAME_MAX} characters"
        )));
    }
    Ok(name)
}
