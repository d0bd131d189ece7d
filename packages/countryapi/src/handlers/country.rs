use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::extractors::json::{AppJson, AppQuery};
use crate::models::aggregation::ContinentSummary;
use crate::models::country::{
    CountryListQuery, CountryResponse, CreateCountryRequest, UpdateCountryRequest,
};
use crate::services::{Aggregator, CountryRegistry};
use crate::state::AppState;

#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn create_country(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCountryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let model = CountryRegistry::new(&state.db)
        .create(auth_user.user_id, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(CountryResponse::from(model))))
}

#[instrument(skip(state, query))]
pub async fn list_countries(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CountryListQuery>,
) -> Result<Json<Vec<CountryResponse>>, AppError> {
    let countries = CountryRegistry::new(&state.db).list(&query).await?;
    Ok(Json(countries.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_country(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CountryResponse>, AppError> {
    let model = CountryRegistry::new(&state.db).get(id).await?;
    Ok(Json(model.into()))
}

#[instrument(skip(state))]
pub async fn get_country_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CountryResponse>, AppError> {
    let model = CountryRegistry::new(&state.db).get_by_name(&name).await?;
    Ok(Json(model.into()))
}

#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn update_country(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateCountryRequest>,
) -> Result<Json<CountryResponse>, AppError> {
    let model = CountryRegistry::new(&state.db)
        .update(auth_user.user_id, id, &payload)
        .await?;

    Ok(Json(model.into()))
}

#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn delete_country(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    CountryRegistry::new(&state.db)
        .delete(auth_user.user_id, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn summarize_continents(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, ContinentSummary>>, AppError> {
    Ok(Json(Aggregator::new(&state.db).summarize().await?))
}

pub async fn summarize_continent(
    State(state): State<AppState>,
    Path(continent_id): Path<i32>,
) -> Result<Json<ContinentSummary>, AppError> {
    Ok(Json(
        Aggregator::new(&state.db)
            .summarize_continent(continent_id)
            .await?,
    ))
}
