//! Migration: Create patients, medical tests and appointments.
//!
//! Records are owned by their patient. Service, office and doctor links on
//! a record are weak and are cleared when the target row goes away.

use sea_orm_migration::prelude::*;

use crate::config::{
    MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_PASSPORT_LENGTH, MAX_PHONE_LENGTH, MAX_TEXT_LENGTH,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Foreign keys shared by both record tables.
fn record_foreign_keys(table: &mut TableCreateStatement, prefix: &str) {
    table
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{prefix}_patient"))
                .from_col(Records::PatientId)
                .to(Patients::Table, Patients::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{prefix}_service"))
                .from_col(Records::ServiceId)
                .to(Services::Table, Services::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{prefix}_office"))
                .from_col(Records::OfficeId)
                .to(Offices::Table, Offices::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{prefix}_doctor"))
                .from_col(Records::DoctorId)
                .to(Doctors::Table, Doctors::Id)
                .on_delete(ForeignKeyAction::SetNull),
        );
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Patients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Patients::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Patients::AccountId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Patients::FullName)
                            .string_len(MAX_NAME_LENGTH)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Patients::Email)
                            .string_len(MAX_EMAIL_LENGTH)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Patients::Gender)
                            .string_len(1)
                            .not_null()
                            .default("н"),
                    )
                    .col(ColumnDef::new(Patients::PhoneNumber).string_len(MAX_PHONE_LENGTH))
                    .col(ColumnDef::new(Patients::Address).string_len(MAX_NAME_LENGTH))
                    .col(ColumnDef::new(Patients::PassportId).string_len(MAX_PASSPORT_LENGTH))
                    .col(ColumnDef::new(Patients::BirthDate).date())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_patients_account")
                            .from(Patients::Table, Patients::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_patients_full_name")
                    .table(Patients::Table)
                    .col(Patients::FullName)
                    .to_owned(),
            )
            .await?;

        let mut medical_tests = Table::create()
            .table(MedicalTests::Table)
            .if_not_exists()
            .col(ColumnDef::new(Records::Id).uuid().not_null().primary_key())
            .col(
                ColumnDef::new(Records::Date)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(MedicalTests::Name)
                    .string_len(MAX_NAME_LENGTH)
                    .not_null(),
            )
            .col(
                ColumnDef::new(MedicalTests::Result)
                    .string_len(MAX_TEXT_LENGTH)
                    .not_null()
                    .default(""),
            )
            .col(ColumnDef::new(Records::PatientId).uuid().not_null())
            .col(ColumnDef::new(Records::ServiceId).uuid())
            .col(ColumnDef::new(Records::OfficeId).uuid())
            .col(ColumnDef::new(Records::DoctorId).uuid())
            .to_owned();
        record_foreign_keys(&mut medical_tests, "medical_tests");
        manager.create_table(medical_tests).await?;

        let mut appointments = Table::create()
            .table(Appointments::Table)
            .if_not_exists()
            .col(ColumnDef::new(Records::Id).uuid().not_null().primary_key())
            .col(
                ColumnDef::new(Records::Date)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(ColumnDef::new(Appointments::PatientComplaints).string_len(MAX_TEXT_LENGTH))
            .col(ColumnDef::new(Appointments::Anamnesis).string_len(MAX_TEXT_LENGTH))
            .col(ColumnDef::new(Appointments::ExaminationResult).string_len(MAX_TEXT_LENGTH))
            .col(ColumnDef::new(Appointments::Diagnosis).string_len(MAX_TEXT_LENGTH))
            .col(ColumnDef::new(Appointments::Recommendations).string_len(MAX_TEXT_LENGTH))
            .col(ColumnDef::new(Records::PatientId).uuid().not_null())
            .col(ColumnDef::new(Records::ServiceId).uuid())
            .col(ColumnDef::new(Records::OfficeId).uuid())
            .col(ColumnDef::new(Records::DoctorId).uuid())
            .to_owned();
        record_foreign_keys(&mut appointments, "appointments");
        manager.create_table(appointments).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_medical_tests_patient_id")
                    .table(MedicalTests::Table)
                    .col(Records::PatientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_appointments_patient_id")
                    .table(Appointments::Table)
                    .col(Records::PatientId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Appointments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MedicalTests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Patients::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
}

#[derive(Iden)]
enum Services {
    Table,
    Id,
}

#[derive(Iden)]
enum Offices {
    Table,
    Id,
}

#[derive(Iden)]
enum Doctors {
    Table,
    Id,
}

#[derive(Iden)]
enum Patients {
    Table,
    Id,
    AccountId,
    FullName,
    Email,
    Gender,
    PhoneNumber,
    Address,
    PassportId,
    BirthDate,
}

/// Columns common to medical tests and appointments
#[derive(Iden)]
enum Records {
    Id,
    Date,
    PatientId,
    ServiceId,
    OfficeId,
    DoctorId,
}

#[derive(Iden)]
enum MedicalTests {
    Table,
    Name,
    Result,
}

#[derive(Iden)]
enum Appointments {
    Table,
    PatientComplaints,
    Anamnesis,
    ExaminationResult,
    Diagnosis,
    Recommendations,
}
