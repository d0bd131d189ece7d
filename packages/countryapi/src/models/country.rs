use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{validate_range, validate_text};
use crate::entity::country;
use crate::error::AppError;

const NAME_MAX: usize = 128;
const LANGUAGE_MAX: usize = 64;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCountryRequest {
    pub name: String,
    /// Population in millions.
    pub inhabitants: f64,
    pub language: String,
    /// Area in km².
    pub area: f64,
    /// GDP in billion USD.
    pub gdp: f64,
    pub continent_id: i32,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct UpdateCountryRequest {
    pub name: Option<String>,
    pub inhabitants: Option<f64>,
    pub language: Option<String>,
    pub area: Option<f64>,
    pub gdp: Option<f64>,
    pub continent_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CountryListQuery {
    pub continent_id: Option<i32>,
    pub owner_id: Option<i32>,
    pub language: Option<String>,
    pub min_inhabitants: Option<f64>,
    pub max_inhabitants: Option<f64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    pub min_gdp: Option<f64>,
    pub max_gdp: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CountryResponse {
    pub id: i32,
    pub name: String,
    pub inhabitants: f64,
    pub language: String,
    pub area: f64,
    pub gdp: f64,
    pub continent_id: i32,
    pub owner_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<country::Model> for CountryResponse {
    fn from(m: country::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            inhabitants: m.inhabitants,
            language: m.language,
            area: m.area,
            gdp: m.gdp,
            continent_id: m.continent_id,
            owner_id: m.user_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn validate_inhabitants(v: f64) -> Result<(), AppError> {
    if !v.is_finite() || v < 0.0 {
        return Err(AppError::Validation(
            "Inhabitants must be a non-negative number".into(),
        ));
    }
    Ok(())
}

fn validate_area(v: f64) -> Result<(), AppError> {
    if !v.is_finite() || v <= 0.0 {
        return Err(AppError::Validation("Area must be a positive number".into()));
    }
    Ok(())
}

fn validate_gdp(v: f64) -> Result<(), AppError> {
    if !v.is_finite() || v < 0.0 {
        return Err(AppError::Validation("GDP must be a non-negative number".into()));
    }
    Ok(())
}

pub fn validate_create_country(req: &CreateCountryRequest) -> Result<(), AppError> {
    validate_text(&req.name, "Name", NAME_MAX)?;
    validate_text(&req.language, "Language", LANGUAGE_MAX)?;
    validate_inhabitants(req.inhabitants)?;
    validate_area(req.area)?;
    validate_gdp(req.gdp)
}

pub fn validate_update_country(req: &UpdateCountryRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_text(name, "Name", NAME_MAX)?;
    }
    if let Some(ref language) = req.language {
        validate_text(language, "Language", LANGUAGE_MAX)?;
    }
    if let Some(v) = req.inhabitants {
        validate_inhabitants(v)?;
    }
    if let Some(v) = req.area {
        validate_area(v)?;
    }
    if let Some(v) = req.gdp {
        validate_gdp(v)?;
    }
    Ok(())
}

pub fn validate_country_list_query(query: &CountryListQuery) -> Result<(), AppError> {
    validate_range(query.min_inhabitants, query.max_inhabitants, "inhabitants")?;
    validate_range(query.min_area, query.max_area, "area")?;
    validate_range(query.min_gdp, query.max_gdp, "gdp")
}
