//! Employee database entity.

use sea_orm::entity::prelude::*;

use crate::domain::{Employee, Gender};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub account_id: Uuid,
    pub full_name: String,
    /// Gender code: м, ж or н
    pub gender: String,
    pub phone_number: Option<String>,
    pub record_book_id: Option<String>,
    pub passport_id: Option<String>,
    pub birth_date: Option<Date>,
    pub position_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id",
        on_delete = "Restrict"
    )]
    Account,
    #[sea_orm(
        belongs_to = "super::position::Entity",
        from = "Column::PositionId",
        to = "super::position::Column::Id",
        on_delete = "Restrict"
    )]
    Position,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::position::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Position.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Employee {
    fn from(model: Model) -> Self {
        Employee {
            id: model.id,
            account_id: model.account_id,
            full_name: model.full_name,
            gender: Gender::from_code(&model.gender),
            phone_number: model.phone_number,
            record_book_id: model.record_book_id,
            passport_id: model.passport_id,
            birth_date: model.birth_date,
            position_id: model.position_id,
        }
    }
}
