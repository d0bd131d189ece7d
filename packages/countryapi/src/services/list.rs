use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, Unchanged,
};
use tracing::instrument;

use crate::entity::{favourite, visited};
use crate::error::AppError;
use crate::models::list::{ListEntry, normalize_country_name};

/// Which personal list an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Visited,
    Favourite,
}

impl ListKind {
    pub fn label(self) -> &'static str {
        match self {
            ListKind::Visited => "visited",
            ListKind::Favourite => "favourite",
        }
    }
}

/// A user's set of country names, keyed by normalized name rather than by
/// registry id. Entries may name countries nobody has registered.
pub struct PersonalList<'a> {
    db: &'a DatabaseConnection,
    kind: ListKind,
}

impl<'a> PersonalList<'a> {
    pub fn new(db: &'a DatabaseConnection, kind: ListKind) -> Self {
        Self { db, kind }
    }

    pub fn visited(db: &'a DatabaseConnection) -> Self {
        Self::new(db, ListKind::Visited)
    }

    pub fn favourite(db: &'a DatabaseConnection) -> Self {
        Self::new(db, ListKind::Favourite)
    }

    /// Add `country_name` to the actor's list. A second add of the same name
    /// is rejected with `Conflict` and leaves the single existing entry.
    #[instrument(skip(self), fields(list = self.kind.label()))]
    pub async fn add(&self, actor_id: i32, country_name: &str) -> Result<ListEntry, AppError> {
        let name = normalize_country_name(country_name)?;

        let txn = self.db.begin().await?;

        if self.find_entry(&txn, actor_id, &name).await?.is_some() {
            return Err(self.duplicate(&name));
        }

        let now = Utc::now();
        let inserted: Result<ListEntry, DbErr> = match self.kind {
            ListKind::Visited => visited::ActiveModel {
                country_name: Set(name.clone()),
                user_id: Set(actor_id),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map(ListEntry::from),
            ListKind::Favourite => favourite::ActiveModel {
                country_name: Set(name.clone()),
                user_id: Set(actor_id),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map(ListEntry::from),
        };
        let entry =
            inserted.map_err(|e| AppError::unique_or_internal(e, || self.duplicate(&name)))?;

        txn.commit().await?;
        Ok(entry)
    }

    /// Remove `country_name` from the actor's list.
    #[instrument(skip(self), fields(list = self.kind.label()))]
    pub async fn remove(&self, actor_id: i32, country_name: &str) -> Result<(), AppError> {
        let name = normalize_country_name(country_name)?;

        let txn = self.db.begin().await?;

        let result = match self.kind {
            ListKind::Visited => {
                visited::Entity::delete_many()
                    .filter(visited::Column::UserId.eq(actor_id))
                    .filter(visited::Column::CountryName.eq(name.as_str()))
                    .exec(&txn)
                    .await?
            }
            ListKind::Favourite => {
                favourite::Entity::delete_many()
                    .filter(favourite::Column::UserId.eq(actor_id))
                    .filter(favourite::Column::CountryName.eq(name.as_str()))
                    .exec(&txn)
                    .await?
            }
        };

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "'{name}' is not on your {} list",
                self.kind.label()
            )));
        }

        txn.commit().await?;
        Ok(())
    }

    /// The actor's own entries, ordered by country name.
    pub async fn list_for(&self, actor_id: i32) -> Result<Vec<ListEntry>, AppError> {
        let entries = match self.kind {
            ListKind::Visited => visited::Entity::find()
                .filter(visited::Column::UserId.eq(actor_id))
                .order_by_asc(visited::Column::CountryName)
                .all(self.db)
                .await?
                .into_iter()
                .map(ListEntry::from)
                .collect(),
            ListKind::Favourite => favourite::Entity::find()
                .filter(favourite::Column::UserId.eq(actor_id))
                .order_by_asc(favourite::Column::CountryName)
                .all(self.db)
                .await?
                .into_iter()
                .map(ListEntry::from)
                .collect(),
        };
        Ok(entries)
    }

    /// Every user's entry for `country_name`, ordered by user id.
    pub async fn holders(&self, country_name: &str) -> Result<Vec<ListEntry>, AppError> {
        let name = normalize_country_name(country_name)?;

        let entries = match self.kind {
            ListKind::Visited => visited::Entity::find()
                .filter(visited::Column::CountryName.eq(name.as_str()))
                .order_by_asc(visited::Column::UserId)
                .all(self.db)
                .await?
                .into_iter()
                .map(ListEntry::from)
                .collect(),
            ListKind::Favourite => favourite::Entity::find()
                .filter(favourite::Column::CountryName.eq(name.as_str()))
                .order_by_asc(favourite::Column::UserId)
                .all(self.db)
                .await?
                .into_iter()
                .map(ListEntry::from)
                .collect(),
        };
        Ok(entries)
    }

    /// A single entry by id. Entries are public, like [`Self::holders`].
    pub async fn get(&self, entry_id: i32) -> Result<ListEntry, AppError> {
        self.find_by_id(self.db, entry_id, false)
            .await?
            .ok_or_else(|| self.missing(entry_id))
    }

    /// Point one of the actor's entries at another name.
    ///
    /// Ownership is checked before the new name is validated. Renaming onto a
    /// name the actor already holds is a `Conflict`.
    #[instrument(skip(self), fields(list = self.kind.label()))]
    pub async fn rename(
        &self,
        actor_id: i32,
        entry_id: i32,
        country_name: &str,
    ) -> Result<ListEntry, AppError> {
        let txn = self.db.begin().await?;

        let existing = self
            .find_by_id(&txn, entry_id, true)
            .await?
            .ok_or_else(|| self.missing(entry_id))?;
        if existing.user_id != actor_id {
            tracing::debug!(
                actor_id,
                owner_id = existing.user_id,
                "Rejected list entry rename by non-owner"
            );
            return Err(AppError::PermissionDenied);
        }

        let name = normalize_country_name(country_name)?;
        if name == existing.country_name {
            return Ok(existing);
        }
        if self.find_entry(&txn, actor_id, &name).await?.is_some() {
            return Err(self.duplicate(&name));
        }

        let updated: Result<ListEntry, DbErr> = match self.kind {
            ListKind::Visited => visited::ActiveModel {
                id: Unchanged(entry_id),
                country_name: Set(name.clone()),
                ..Default::default()
            }
            .update(&txn)
            .await
            .map(ListEntry::from),
            ListKind::Favourite => favourite::ActiveModel {
                id: Unchanged(entry_id),
                country_name: Set(name.clone()),
                ..Default::default()
            }
            .update(&txn)
            .await
            .map(ListEntry::from),
        };
        let entry =
            updated.map_err(|e| AppError::unique_or_internal(e, || self.duplicate(&name)))?;

        txn.commit().await?;
        Ok(entry)
    }

    async fn find_by_id<C: ConnectionTrait>(
        &self,
        db: &C,
        entry_id: i32,
        for_update: bool,
    ) -> Result<Option<ListEntry>, DbErr> {
        let entry = match self.kind {
            ListKind::Visited => {
                let mut select = visited::Entity::find_by_id(entry_id);
                if for_update {
                    select = select.lock(LockType::Update);
                }
                select.one(db).await?.map(ListEntry::from)
            }
            ListKind::Favourite => {
                let mut select = favourite::Entity::find_by_id(entry_id);
                if for_update {
                    select = select.lock(LockType::Update);
                }
                select.one(db).await?.map(ListEntry::from)
            }
        };
        Ok(entry)
    }

    async fn find_entry<C: ConnectionTrait>(
        &self,
        db: &C,
        actor_id: i32,
        name: &str,
    ) -> Result<Option<ListEntry>, DbErr> {
        let entry = match self.kind {
            ListKind::Visited => visited::Entity::find()
                .filter(visited::Column::UserId.eq(actor_id))
                .filter(visited::Column::CountryName.eq(name))
                .one(db)
                .await?
                .map(ListEntry::from),
            ListKind::Favourite => favourite::Entity::find()
                .filter(favourite::Column::UserId.eq(actor_id))
                .filter(favourite::Column::CountryName.eq(name))
                .one(db)
                .await?
                .map(ListEntry::from),
        };
        Ok(entry)
    }

    fn missing(&self, entry_id: i32) -> AppError {
        AppError::NotFound(format!(
            "No {} entry with id {entry_id}",
            self.kind.label()
        ))
    }

    fn duplicate(&self, name: &str) -> AppError {
        tracing::debug!(list = self.kind.label(), name, "Rejected duplicate list entry");
        AppError::Conflict(format!(
            "'{name}' is already on your {} list",
            self.kind.label()
        ))
    }
}
