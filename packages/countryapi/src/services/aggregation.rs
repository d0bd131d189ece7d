use std::collections::BTreeMap;

use sea_orm::{
    AccessMode, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, IsolationLevel,
    QueryFilter, QueryOrder, QuerySelect, Select, SelectModel, Selector, TransactionTrait,
};
use tracing::instrument;

use super::continent::find_continent;
use crate::entity::{continent, country, favourite};
use crate::error::AppError;
use crate::models::aggregation::{
    ContinentSummary, ContinentTotals, RankingEntry, rank_tallies, summarize_totals,
};

/// Read-only views derived from the registry, the lists and the continents.
///
/// Each operation reads inside a `REPEATABLE READ`, read-only transaction so
/// the result reflects one committed snapshot.
pub struct Aggregator<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> Aggregator<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    async fn snapshot(&self) -> Result<DatabaseTransaction, AppError> {
        Ok(self
            .db
            .begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await?)
    }

    /// Favourite counts per country name, most favourited first.
    ///
    /// Tallies run over favourite rows, so names absent from the registry
    /// still rank.
    #[instrument(skip(self))]
    pub async fn rank(&self) -> Result<Vec<RankingEntry>, AppError> {
        let txn = self.snapshot().await?;

        let tallies = favourite::Entity::find()
            .select_only()
            .column(favourite::Column::CountryName)
            .column_as(favourite::Column::Id.count(), "favourite_count")
            .group_by(favourite::Column::CountryName)
            .into_model::<RankingEntry>()
            .all(&txn)
            .await?;

        txn.commit().await?;
        Ok(rank_tallies(tallies))
    }

    /// Summary of every continent keyed by alias.
    #[instrument(skip(self))]
    pub async fn summarize(&self) -> Result<BTreeMap<String, ContinentSummary>, AppError> {
        let txn = self.snapshot().await?;

        let continents = continent::Entity::find()
            .order_by_asc(continent::Column::Id)
            .all(&txn)
            .await?;
        let totals = continent_totals(country::Entity::find()).all(&txn).await?;

        txn.commit().await?;
        Ok(summarize_totals(
            continents.into_iter().map(|c| (c.id, c.alias)),
            totals,
        ))
    }

    /// Summary of a single continent.
    #[instrument(skip(self))]
    pub async fn summarize_continent(
        &self,
        continent_id: i32,
    ) -> Result<ContinentSummary, AppError> {
        let txn = self.snapshot().await?;

        find_continent(&txn, continent_id).await?;
        let totals = continent_totals(
            country::Entity::find().filter(country::Column::ContinentId.eq(continent_id)),
        )
        .one(&txn)
        .await?;

        txn.commit().await?;
        Ok(ContinentSummary::from_totals(totals.as_ref()))
    }
}

/// Per-continent count and sums over the given country selection.
fn continent_totals(select: Select<country::Entity>) -> Selector<SelectModel<ContinentTotals>> {
    select
        .select_only()
        .column(country::Column::ContinentId)
        .column_as(country::Column::Id.count(), "country_count")
        .column_as(country::Column::Inhabitants.sum(), "total_inhabitants")
        .column_as(country::Column::Area.sum(), "total_area")
        .column_as(country::Column::Gdp.sum(), "total_gdp")
        .group_by(country::Column::ContinentId)
        .into_model::<ContinentTotals>()
}
