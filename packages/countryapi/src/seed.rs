use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::{continent, country, favourite, visited};

/// Fixed continent catalog as `(alias, name)`.
pub const CONTINENTS: &[(&str, &str)] = &[
    ("AF", "Africa"),
    ("AN", "Antarctica"),
    ("AS", "Asia"),
    ("EU", "Europe"),
    ("NA", "North America"),
    ("OC", "Oceania"),
    ("SA", "South America"),
];

/// Seed the `continents` table. Existing aliases are left untouched.
pub async fn seed_continents(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut inserted = 0u32;
    for &(alias, name) in CONTINENTS {
        let model = continent::ActiveModel {
            name: Set(name.to_string()),
            alias: Set(alias.to_string()),
            ..Default::default()
        };

        let result = continent::Entity::insert(model)
            .on_conflict(
                OnConflict::column(continent::Column::Alias)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new continents", inserted);
    }

    Ok(())
}

/// Ensure required database indexes exist.
///
/// Schema-sync only knows single-column constraints, so the per-user list
/// uniqueness is created here. Those two are required; the continent lookup
/// index is best effort.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_visited_user_country")
        .table(visited::Entity)
        .col(visited::Column::UserId)
        .col(visited::Column::CountryName)
        .to_string(PostgresQueryBuilder);
    db.execute_unprepared(&stmt).await?;
    info!("Ensured index idx_visited_user_country exists");

    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_favourite_user_country")
        .table(favourite::Entity)
        .col(favourite::Column::UserId)
        .col(favourite::Column::CountryName)
        .to_string(PostgresQueryBuilder);
    db.execute_unprepared(&stmt).await?;
    info!("Ensured index idx_favourite_user_country exists");

    // Per-continent aggregation and list filtering
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_countries_continent")
        .table(country::Entity)
        .col(country::Column::ContinentId)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index idx_countries_continent exists"),
        Err(e) => tracing::warn!("Failed to create index idx_countries_continent: {}", e),
    }

    Ok(())
}
