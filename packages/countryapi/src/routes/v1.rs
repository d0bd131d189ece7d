use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/continents", continent_routes())
        .nest("/countries", country_routes())
        .nest("/visited", visited_routes())
        .nest("/favourites", favourite_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
        .route("/password", put(handlers::auth::change_password))
}

fn continent_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::continent::list_continents))
        .route("/{id}", get(handlers::continent::get_continent))
        .route(
            "/alias/{alias}",
            get(handlers::continent::get_continent_by_alias),
        )
}

fn country_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::country::list_countries).post(handlers::country::create_country),
        )
        .route(
            "/{id}",
            get(handlers::country::get_country)
                .patch(handlers::country::update_country)
                .delete(handlers::country::delete_country),
        )
        .route("/name/{name}", get(handlers::country::get_country_by_name))
        .route("/summary", get(handlers::country::summarize_continents))
        .route(
            "/summary/{continent_id}",
            get(handlers::country::summarize_continent),
        )
}

fn visited_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list::list_visited).post(handlers::list::add_visited),
        )
        .route("/{country_name}", delete(handlers::list::remove_visited))
        .route(
            "/entry/{entry_id}",
            get(handlers::list::get_visited_entry).put(handlers::list::rename_visited),
        )
        .route(
            "/country/{country_name}",
            get(handlers::list::visited_by_country),
        )
}

fn favourite_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list::list_favourites).post(handlers::list::add_favourite),
        )
        .route("/ranking", get(handlers::list::favourite_ranking))
        .route("/{country_name}", delete(handlers::list::remove_favourite))
        .route(
            "/entry/{entry_id}",
            get(handlers::list::get_favourite_entry).put(handlers::list::rename_favourite),
        )
        .route(
            "/country/{country_name}",
            get(handlers::list::favourites_by_country),
        )
}
