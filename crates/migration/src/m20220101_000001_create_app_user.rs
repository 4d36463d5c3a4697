//! Create `app_user` table holding one credential record per user.
//!
//! `username_key` is the case-normalized username; uniqueness is enforced on
//! it by the index migration. It is three times the username width because
//! lowercasing may expand a character. Only the password hash and salt are stored.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppUser::Table)
                    .if_not_exists()
                    .col(pk_auto(AppUser::Id))
                    .col(string_len(AppUser::Username, 64).not_null())
                    .col(string_len(AppUser::UsernameKey, 192).not_null())
                    .col(string_len(AppUser::PasswordHash, 128).not_null())
                    .col(string_len(AppUser::PasswordSalt, 64).not_null())
                    .col(timestamp_with_time_zone(AppUser::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AppUser::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum AppUser { Table, Id, Username, UsernameKey, PasswordHash, PasswordSalt, CreatedAt }
