//! Migration: Create offices, services and their join tables.

use sea_orm_migration::prelude::*;

use crate::config::{MAX_NAME_LENGTH, MAX_OFFICE_NUMBER_LENGTH, MAX_TEXT_LENGTH};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Offices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Offices::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Offices::OfficeNumber)
                            .string_len(MAX_OFFICE_NUMBER_LENGTH)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Services::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Services::Name)
                            .string_len(MAX_NAME_LENGTH)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Services::Description).string_len(MAX_TEXT_LENGTH))
                    .col(ColumnDef::new(Services::Cost).integer())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_services_name")
                    .table(Services::Table)
                    .col(Services::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ServiceOffices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ServiceOffices::ServiceId).uuid().not_null())
                    .col(ColumnDef::new(ServiceOffices::OfficeId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(ServiceOffices::ServiceId)
                            .col(ServiceOffices::OfficeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_offices_service")
                            .from(ServiceOffices::Table, ServiceOffices::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_offices_office")
                            .from(ServiceOffices::Table, ServiceOffices::OfficeId)
                            .to(Offices::Table, Offices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ServiceDoctors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ServiceDoctors::ServiceId).uuid().not_null())
                    .col(ColumnDef::new(ServiceDoctors::DoctorId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(ServiceDoctors::ServiceId)
                            .col(ServiceDoctors::DoctorId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_doctors_service")
                            .from(ServiceDoctors::Table, ServiceDoctors::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_doctors_doctor")
                            .from(ServiceDoctors::Table, ServiceDoctors::DoctorId)
                            .to(Doctors::Table, Doctors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceDoctors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ServiceOffices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Offices::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Doctors {
    Table,
    Id,
}

#[derive(Iden)]
enum Offices {
    Table,
    Id,
    OfficeNumber,
}

#[derive(Iden)]
enum Services {
    Table,
    Id,
    Name,
    Description,
    Cost,
}

#[derive(Iden)]
enum ServiceOffices {
    Table,
    ServiceId,
    OfficeId,
}

#[derive(Iden)]
enum ServiceDoctors {
    Table,
    ServiceId,
    DoctorId,
}
