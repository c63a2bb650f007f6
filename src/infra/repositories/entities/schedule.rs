//! Schedule database entity.

use sea_orm::entity::prelude::*;

use crate::domain::{Schedule, Weekday};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "schedules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employee_id: Uuid,
    /// Monday = 0
    pub weekday: i16,
    pub work_start_time: Time,
    pub work_end_time: Time,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id",
        on_delete = "Cascade"
    )]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Schedule {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let weekday = Weekday::from_ordinal(model.weekday).ok_or_else(|| {
            AppError::internal(format!(
                "schedule {} has unknown weekday {}",
                model.id, model.weekday
            ))
        })?;
        Ok(Schedule {
            id: model.id,
            employee_id: model.employee_id,
            weekday,
            work_start_time: model.work_start_time,
            work_end_time: model.work_end_time,
        })
    }
}
