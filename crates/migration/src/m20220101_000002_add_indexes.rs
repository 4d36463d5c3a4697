use sea_orm_migration::prelude::*;

use crate::m20220101_000001_create_app_user::AppUser;

/// Name of the unique index backing username uniqueness.
pub const UNIQ_USERNAME_KEY: &str = "uniq_app_user_username_key";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(UNIQ_USERNAME_KEY)
                    .table(AppUser::Table)
                    .col(AppUser::UsernameKey)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(UNIQ_USERNAME_KEY).table(AppUser::Table).to_owned())
            .await
    }
}
