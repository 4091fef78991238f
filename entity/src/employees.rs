use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Text")]
    pub first_name: String,
    #[sea_orm(column_type = "Text")]
    pub last_name: String,
    #[sea_orm(column_type = "Text", indexed)]
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Client-supplied employee fields. Any `id` in the payload is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Model {
    /// Overwrite the mutable fields, keeping `id`.
    pub fn apply(&mut self, fields: EmployeeFields) {
        self.first_name = fields.first_name;
        self.last_name = fields.last_name;
        self.email = fields.email;
    }
}
