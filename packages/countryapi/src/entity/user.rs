use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Stored trimmed and lower-cased.
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    /// Argon2 PHC string, never the plaintext secret.
    #[serde(skip_serializing)]
    pub password_hash: String,

    #[sea_orm(has_many)]
    pub countries: HasMany<super::country::Entity>,

    #[sea_orm(has_many)]
    pub visited: HasMany<super::visited::Entity>,

    #[sea_orm(has_many)]
    pub favourites: HasMany<super::favourite::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
