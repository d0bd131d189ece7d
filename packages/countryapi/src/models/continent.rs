use serde::Serialize;

use crate::entity::continent;

#[derive(Debug, Serialize)]
pub struct ContinentResponse {
    pub id: i32,
    pub name: String,
    pub alias: String,
}

impl From<continent::Model> for ContinentResponse {
    fn from(m: continent::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            alias: m.alias,
        }
    }
}
