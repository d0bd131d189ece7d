use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "countries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
    pub inhabitants: f64, // in millions
    pub language: String,
    pub area: f64, // in km²
    #[sea_orm(column_name = "pkb")]
    pub gdp: f64, // in billion USD

    pub continent_id: i32,
    #[sea_orm(belongs_to, from = "continent_id", to = "id")]
    pub continent: HasOne<super::continent::Entity>,

    /// Owner; set once at creation.
    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
