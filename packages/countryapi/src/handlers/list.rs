//! Handlers for the visited and favourite lists. Both lists share one
//! implementation parametrized by [`ListKind`].

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::aggregation::RankingEntry;
use crate::models::list::{EntryRequest, ListEntry};
use crate::services::{Aggregator, ListKind, PersonalList};
use crate::state::AppState;

async fn add_entry(
    kind: ListKind,
    auth_user: &AuthUser,
    state: &AppState,
    payload: &EntryRequest,
) -> Result<(StatusCode, Json<ListEntry>), AppError> {
    let entry = PersonalList::new(&state.db, kind)
        .add(auth_user.user_id, &payload.country_name)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn rename_entry(
    kind: ListKind,
    auth_user: &AuthUser,
    state: &AppState,
    entry_id: i32,
    payload: &EntryRequest,
) -> Result<Json<ListEntry>, AppError> {
    let entry = PersonalList::new(&state.db, kind)
        .rename(auth_user.user_id, entry_id, &payload.country_name)
        .await?;
    Ok(Json(entry))
}

async fn remove_entry(
    kind: ListKind,
    auth_user: &AuthUser,
    state: &AppState,
    country_name: &str,
) -> Result<StatusCode, AppError> {
    PersonalList::new(&state.db, kind)
        .remove(auth_user.user_id, country_name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn add_visited(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<EntryRequest>,
) -> Result<impl IntoResponse, AppError> {
    add_entry(ListKind::Visited, &auth_user, &state, &payload).await
}

#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn remove_visited(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(country_name): Path<String>,
) -> Result<StatusCode, AppError> {
    remove_entry(ListKind::Visited, &auth_user, &state, &country_name).await
}

pub async fn list_visited(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ListEntry>>, AppError> {
    Ok(Json(
        PersonalList::visited(&state.db)
            .list_for(auth_user.user_id)
            .await?,
    ))
}

pub async fn get_visited_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<i32>,
) -> Result<Json<ListEntry>, AppError> {
    Ok(Json(PersonalList::visited(&state.db).get(entry_id).await?))
}

#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn rename_visited(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(entry_id): Path<i32>,
    AppJson(payload): AppJson<EntryRequest>,
) -> Result<Json<ListEntry>, AppError> {
    rename_entry(ListKind::Visited, &auth_user, &state, entry_id, &payload).await
}

pub async fn visited_by_country(
    State(state): State<AppState>,
    Path(country_name): Path<String>,
) -> Result<Json<Vec<ListEntry>>, AppError> {
    Ok(Json(
        PersonalList::visited(&state.db)
            .holders(&country_name)
            .await?,
    ))
}

#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn add_favourite(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<EntryRequest>,
) -> Result<impl IntoResponse, AppError> {
    add_entry(ListKind::Favourite, &auth_user, &state, &payload).await
}

#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn remove_favourite(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(country_name): Path<String>,
) -> Result<StatusCode, AppError> {
    remove_entry(ListKind::Favourite, &auth_user, &state, &country_name).await
}

pub async fn list_favourites(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ListEntry>>, AppError> {
    Ok(Json(
        PersonalList::favourite(&state.db)
            .list_for(auth_user.user_id)
            .await?,
    ))
}

pub async fn get_favourite_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<i32>,
) -> Result<Json<ListEntry>, AppError> {
    Ok(Json(PersonalList::favourite(&state.db).get(entry_id).await?))
}

#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn rename_favourite(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(entry_id): Path<i32>,
    AppJson(payload): AppJson<EntryRequest>,
) -> Result<Json<ListEntry>, AppError> {
    rename_entry(ListKind::Favourite, &auth_user, &state, entry_id, &payload).await
}

pub async fn favourites_by_country(
    State(state): State<AppState>,
    Path(country_name): Path<String>,
) -> Result<Json<Vec<ListEntry>>, AppError> {
    Ok(Json(
        PersonalList::favourite(&state.db)
            .holders(&country_name)
            .await?,
    ))
}

pub async fn favourite_ranking(
    State(state): State<AppState>,
) -> Result<Json<Vec<RankingEntry>>, AppError> {
    Ok(Json(Aggregator::new(&state.db).rank().await?))
}
