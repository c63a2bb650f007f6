//! Patient database entity.

use sea_orm::entity::prelude::*;

use crate::domain::{Gender, Patient};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "patients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub account_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub gender: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub passport_id: Option<String>,
    pub birth_date: Option<Date>,
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
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Patient {
    fn from(model: Model) -> Self {
        Patient {
            id: model.id,
            account_id: model.account_id,
            full_name: model.full_name,
            email: model.email,
            gender: Gender::from_code(&model.gender),
            phone_number: model.phone_number,
            address: model.address,
            passport_id: model.passport_id,
            birth_date: model.birth_date,
        }
    }
}
