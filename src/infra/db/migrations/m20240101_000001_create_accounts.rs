//! Migration: Create accounts and the fixed role groups.

use sea_orm_migration::prelude::*;

use crate::config::{MAX_USERNAME_LENGTH, ROLE_GROUPS};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Accounts::Username)
                            .string_len(MAX_USERNAME_LENGTH)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Accounts::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Accounts::Email).string().not_null().default(""))
                    .col(ColumnDef::new(Accounts::FirstName).string().not_null().default(""))
                    .col(ColumnDef::new(Accounts::LastName).string().not_null().default(""))
                    .col(
                        ColumnDef::new(Accounts::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RoleGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoleGroups::Name)
                            .string_len(150)
                            .not_null()
                            .primary_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // Groups are fixed; the policy table refers to them by name
        let mut seed = Query::insert();
        seed.into_table(RoleGroups::Table).columns([RoleGroups::Name]);
        for group in ROLE_GROUPS {
            seed.values_panic([(*group).into()]);
        }
        manager.exec_stmt(seed).await?;

        manager
            .create_table(
                Table::create()
                    .table(AccountGroups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AccountGroups::AccountId).uuid().not_null())
                    .col(
                        ColumnDef::new(AccountGroups::GroupName)
                            .string_len(150)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(AccountGroups::AccountId)
                            .col(AccountGroups::GroupName),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_groups_account")
                            .from(AccountGroups::Table, AccountGroups::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_groups_group")
                            .from(AccountGroups::Table, AccountGroups::GroupName)
                            .to(RoleGroups::Table, RoleGroups::Name)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccountGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RoleGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Username,
    PasswordHash,
    Email,
    FirstName,
    LastName,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum RoleGroups {
    Table,
    Name,
}

#[derive(Iden)]
enum AccountGroups {
    Table,
    AccountId,
    GroupName,
}
