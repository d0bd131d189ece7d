use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait, Func, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::instrument;

use super::continent::find_continent;
use crate::entity::country;
use crate::error::AppError;
use crate::models::country::{
    CountryListQuery, CreateCountryRequest, UpdateCountryRequest, validate_country_list_query,
    validate_create_country, validate_update_country,
};
use crate::models::list::normalize_country_name;

/// Country records owned by the users who created them.
pub struct CountryRegistry<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CountryRegistry<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a country owned by `actor_id`.
    #[instrument(skip(self, payload), fields(name = %payload.name))]
    pub async fn create(
        &self,
        actor_id: i32,
        payload: &CreateCountryRequest,
    ) -> Result<country::Model, AppError> {
        validate_create_country(payload)?;
        let name = normalize_country_name(&payload.name)?;

        let txn = self.db.begin().await?;

        find_continent(&txn, payload.continent_id).await?;
        ensure_name_free(&txn, &name, None).await?;

        let now = Utc::now();
        let new_country = country::ActiveModel {
            name: Set(name.clone()),
            inhabitants: Set(payload.inhabitants),
            language: Set(payload.language.trim().to_string()),
            area: Set(payload.area),
            gdp: Set(payload.gdp),
            continent_id: Set(payload.continent_id),
            user_id: Set(actor_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = new_country
            .insert(&txn)
            .await
            .map_err(|e| AppError::unique_or_internal(e, || name_taken(&name)))?;

        txn.commit().await?;
        tracing::info!(country_id = model.id, "Country created");
        Ok(model)
    }

    /// Patch a country. Only the owner may update it.
    ///
    /// Ownership is checked before the payload is validated, so a non-owner
    /// always gets `PermissionDenied`.
    #[instrument(skip(self, payload))]
    pub async fn update(
        &self,
        actor_id: i32,
        id: i32,
        payload: &UpdateCountryRequest,
    ) -> Result<country::Model, AppError> {
        let txn = self.db.begin().await?;

        let existing = find_country_for_update(&txn, id).await?;
        ensure_owner(actor_id, &existing)?;
        validate_update_country(payload)?;

        if *payload == UpdateCountryRequest::default() {
            return Ok(existing);
        }

        if let Some(continent_id) = payload.continent_id {
            find_continent(&txn, continent_id).await?;
        }

        let new_name = payload
            .name
            .as_deref()
            .map(normalize_country_name)
            .transpose()?;
        if let Some(ref name) = new_name
            && *name != existing.name
        {
            ensure_name_free(&txn, name, Some(id)).await?;
        }

        let conflict_name = new_name.clone().unwrap_or_else(|| existing.name.clone());
        let mut active: country::ActiveModel = existing.into();

        if let Some(name) = new_name {
            active.name = Set(name);
        }
        if let Some(inhabitants) = payload.inhabitants {
            active.inhabitants = Set(inhabitants);
        }
        if let Some(ref language) = payload.language {
            active.language = Set(language.trim().to_string());
        }
        if let Some(area) = payload.area {
            active.area = Set(area);
        }
        if let Some(gdp) = payload.gdp {
            active.gdp = Set(gdp);
        }
        if let Some(continent_id) = payload.continent_id {
            active.continent_id = Set(continent_id);
        }
        active.updated_at = Set(Utc::now());

        let model = active
            .update(&txn)
            .await
            .map_err(|e| AppError::unique_or_internal(e, || name_taken(&conflict_name)))?;

        txn.commit().await?;
        Ok(model)
    }

    /// Delete a country. Personal list entries with the same name are untouched.
    #[instrument(skip(self))]
    pub async fn delete(&self, actor_id: i32, id: i32) -> Result<(), AppError> {
        let txn = self.db.begin().await?;

        let existing = find_country_for_update(&txn, id).await?;
        ensure_owner(actor_id, &existing)?;

        country::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        tracing::info!(country_id = id, "Country deleted");
        Ok(())
    }

    pub async fn get(&self, id: i32) -> Result<country::Model, AppError> {
        country::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Country not found".into()))
    }

    /// Lookup by name, normalized the same way list entries are.
    pub async fn get_by_name(&self, name: &str) -> Result<country::Model, AppError> {
        let name = normalize_country_name(name)?;
        country::Entity::find()
            .filter(country::Column::Name.eq(name.as_str()))
            .one(self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Country not found".into()))
    }

    /// Countries matching every given filter, ordered by name.
    #[instrument(skip(self, query))]
    pub async fn list(&self, query: &CountryListQuery) -> Result<Vec<country::Model>, AppError> {
        validate_country_list_query(query)?;

        let mut select = country::Entity::find();

        if let Some(continent_id) = query.continent_id {
            select = select.filter(country::Column::ContinentId.eq(continent_id));
        }
        if let Some(owner_id) = query.owner_id {
            select = select.filter(country::Column::UserId.eq(owner_id));
        }
        if let Some(ref language) = query.language {
            let language = language.trim();
            if !language.is_empty() {
                select = select.filter(
                    Expr::expr(Func::lower(Expr::col(country::Column::Language)))
                        .eq(language.to_lowercase()),
                );
            }
        }

        let ranges = [
            (country::Column::Inhabitants, query.min_inhabitants, query.max_inhabitants),
            (country::Column::Area, query.min_area, query.max_area),
            (country::Column::Gdp, query.min_gdp, query.max_gdp),
        ];
        for (column, min, max) in ranges {
            if let Some(min) = min {
                select = select.filter(column.gte(min));
            }
            if let Some(max) = max {
                select = select.filter(column.lte(max));
            }
        }

        Ok(select
            .order_by_asc(country::Column::Name)
            .all(self.db)
            .await?)
    }
}

fn ensure_owner(actor_id: i32, country: &country::Model) -> Result<(), AppError> {
    if country.user_id == actor_id {
        Ok(())
    } else {
        tracing::debug!(
            actor_id,
            owner_id = country.user_id,
            "Rejected modification by non-owner"
        );
        Err(AppError::PermissionDenied)
    }
}

fn name_taken(name: &str) -> AppError {
    AppError::Conflict(format!("Country '{name}' already exists"))
}

async fn ensure_name_free<C: ConnectionTrait>(
    db: &C,
    name: &str,
    except_id: Option<i32>,
) -> Result<(), AppError> {
    let mut select = country::Entity::find().filter(country::Column::Name.eq(name));
    if let Some(id) = except_id {
        select = select.filter(country::Column::Id.ne(id));
    }
    if select.count(db).await? > 0 {
        return Err(name_taken(name));
    }
    Ok(())
}

async fn find_country_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<country::Model, AppError> {
    country::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Country not found".into()))
}
