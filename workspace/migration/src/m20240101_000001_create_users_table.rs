use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Base account columns followed by the band/brand extension columns.
        // role_id and currency_id intentionally carry no foreign key.
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len(Users::Username, 150).unique_key())
                    .col(string_len(Users::Email, 254).default(""))
                    .col(string_len(Users::Password, 128))
                    .col(string_len(Users::FirstName, 150).default(""))
                    .col(string_len(Users::LastName, 150).default(""))
                    .col(boolean(Users::IsStaff).default(false))
                    .col(boolean(Users::IsActive).default(true))
                    .col(boolean(Users::IsSuperuser).default(false))
                    .col(timestamp_with_time_zone_null(Users::LastLogin))
                    .col(timestamp_with_time_zone(Users::DateJoined))
                    .col(integer_null(Users::RoleId))
                    .col(string_len_null(Users::Genre, 50))
                    .col(integer_null(Users::CurrencyId))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    Password,
    FirstName,
    LastName,
    IsStaff,
    IsActive,
    IsSuperuser,
    LastLogin,
    DateJoined,
    RoleId,
    Genre,
    CurrencyId,
}
