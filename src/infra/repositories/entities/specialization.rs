//! Specialization database entity.

use sea_orm::entity::prelude::*;

use crate::domain::Specialization;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "specializations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Specialization {
    fn from(model: Model) -> Self {
        Specialization {
            id: model.id,
            name: model.name,
        }
    }
}
