//! Office database entity.

use sea_orm::entity::prelude::*;

use crate::domain::Office;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "offices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub office_number: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Office {
    fn from(model: Model) -> Self {
        Office {
            id: model.id,
            office_number: model.office_number,
        }
    }
}
