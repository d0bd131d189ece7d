use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::instrument;

use crate::entity::continent;
use crate::error::AppError;

/// Read-only access to the continent reference table.
pub struct ContinentCatalog<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ContinentCatalog<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// All continents, ordered by id.
    pub async fn list(&self) -> Result<Vec<continent::Model>, AppError> {
        Ok(continent::Entity::find()
            .order_by_asc(continent::Column::Id)
            .all(self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, id: i32) -> Result<continent::Model, AppError> {
        find_continent(self.db, id).await
    }

    /// Look up a continent by its two-letter alias, ignoring case.
    #[instrument(skip(self))]
    pub async fn resolve_alias(&self, alias: &str) -> Result<continent::Model, AppError> {
        continent::Entity::find()
            .filter(continent::Column::Alias.eq(alias.trim().to_uppercase()))
            .one(self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Continent not found".into()))
    }
}

/// Look up a continent by ID, returning 404 if not found.
pub async fn find_continent<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<continent::Model, AppError> {
    continent::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Continent not found".into()))
}
