//! Medical test database entity.

use sea_orm::entity::prelude::*;

use crate::domain::MedicalTest;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "medical_tests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub date: DateTimeUtc,
    pub name: String,
    pub result: String,
    pub patient_id: Uuid,
    pub service_id: Option<Uuid>,
    pub office_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::patient::Entity",
        from = "Column::PatientId",
        to = "super::patient::Column::Id",
        on_delete = "Cascade"
    )]
    Patient,
    #[sea_orm(
        belongs_to = "super::service::Entity",
        from = "Column::ServiceId",
        to = "super::service::Column::Id",
        on_delete = "SetNull"
    )]
    Service,
    #[sea_orm(
        belongs_to = "super::office::Entity",
        from = "Column::OfficeId",
        to = "super::office::Column::Id",
        on_delete = "SetNull"
    )]
    Office,
    #[sea_orm(
        belongs_to = "super::doctor::Entity",
        from = "Column::DoctorId",
        to = "super::doctor::Column::Id",
        on_delete = "SetNull"
    )]
    Doctor,
}

impl Related<super::patient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patient.def()
    }
}

impl Related<super::doctor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Doctor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for MedicalTest {
    fn from(model: Model) -> Self {
        MedicalTest {
            id: model.id,
            date: model.date,
            name: model.name,
            result: model.result,
            patient_id: model.patient_id,
            service_id: model.service_id,
            office_id: model.office_id,
            doctor_id: model.doctor_id,
        }
    }
}
