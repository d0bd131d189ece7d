use axum::{
    Json,
    extract::{Path, State},
};

use crate::error::AppError;
use crate::models::continent::ContinentResponse;
use crate::services::ContinentCatalog;
use crate::state::AppState;

pub async fn list_continents(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContinentResponse>>, AppError> {
    let continents = ContinentCatalog::new(&state.db).list().await?;
    Ok(Json(continents.into_iter().map(Into::into).collect()))
}

pub async fn get_continent(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ContinentResponse>, AppError> {
    let continent = ContinentCatalog::new(&state.db).resolve(id).await?;
    Ok(Json(continent.into()))
}

pub async fn get_continent_by_alias(
    State(state): State<AppState>,
    Path(alias): Path<String>,
) -> Result<Json<ContinentResponse>, AppError> {
    let continent = ContinentCatalog::new(&state.db)
        .resolve_alias(&alias)
        .await?;
    Ok(Json(continent.into()))
}
