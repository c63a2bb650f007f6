//! Migration: Create positions, specializations, employees, schedules and doctors.

use sea_orm_migration::prelude::*;

use crate::config::{
    MAX_NAME_LENGTH, MAX_PASSPORT_LENGTH, MAX_PHONE_LENGTH, MAX_RECORD_BOOK_LENGTH,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Positions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Positions::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Positions::Name)
                            .string_len(MAX_NAME_LENGTH)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Specializations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Specializations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Specializations::Name)
                            .string_len(MAX_NAME_LENGTH)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employees::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Employees::AccountId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Employees::FullName)
                            .string_len(MAX_NAME_LENGTH)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employees::Gender)
                            .string_len(1)
                            .not_null()
                            .default("н"),
                    )
                    .col(ColumnDef::new(Employees::PhoneNumber).string_len(MAX_PHONE_LENGTH))
                    .col(ColumnDef::new(Employees::RecordBookId).string_len(MAX_RECORD_BOOK_LENGTH))
                    .col(ColumnDef::new(Employees::PassportId).string_len(MAX_PASSPORT_LENGTH))
                    .col(ColumnDef::new(Employees::BirthDate).date())
                    .col(ColumnDef::new(Employees::PositionId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_account")
                            .from(Employees::Table, Employees::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_position")
                            .from(Employees::Table, Employees::PositionId)
                            .to(Positions::Table, Positions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employees_full_name")
                    .table(Employees::Table)
                    .col(Employees::FullName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Schedules::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Schedules::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Schedules::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(Schedules::Weekday).small_integer().not_null())
                    .col(ColumnDef::new(Schedules::WorkStartTime).time().not_null())
                    .col(ColumnDef::new(Schedules::WorkEndTime).time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedules_employee")
                            .from(Schedules::Table, Schedules::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_employee_weekday")
                    .table(Schedules::Table)
                    .col(Schedules::EmployeeId)
                    .col(Schedules::Weekday)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Doctors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Doctors::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Doctors::EmployeeId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Doctors::SpecializationId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_doctors_employee")
                            .from(Doctors::Table, Doctors::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_doctors_specialization")
                            .from(Doctors::Table, Doctors::SpecializationId)
                            .to(Specializations::Table, Specializations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Doctors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Schedules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Specializations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Positions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
}

#[derive(Iden)]
enum Positions {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Specializations {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Employees {
    Table,
    Id,
    AccountId,
    FullName,
    Gender,
    PhoneNumber,
    RecordBookId,
    PassportId,
    BirthDate,
    PositionId,
}

#[derive(Iden)]
enum Schedules {
    Table,
    Id,
    EmployeeId,
    Weekday,
    WorkStartTime,
    WorkEndTime,
}

#[derive(Iden)]
enum Doctors {
    Table,
    Id,
    EmployeeId,
    SpecializationId,
}
