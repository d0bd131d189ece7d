use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "continents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    /// Two-letter upper-case code, e.g. "EU".
    #[sea_orm(unique)]
    pub alias: String,

    #[sea_orm(has_many)]
    pub countries: HasMany<super::country::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
