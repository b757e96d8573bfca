use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub(crate) enum MenuItems {
    Table,
    Id,
    Name,
    Description,
    Price,
    Category,
    ImageUrl,
    IsAvailable,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MenuItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MenuItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(MenuItems::Name).string_len(255).not_null())
                    .col(ColumnDef::new(MenuItems::Description).text().null())
                    .col(ColumnDef::new(MenuItems::Price).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(MenuItems::Category).string_len(100).null())
                    .col(ColumnDef::new(MenuItems::ImageUrl).text().null())
                    .col(
                        ColumnDef::new(MenuItems::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(MenuItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(MenuItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MenuItems::Table).if_exists().to_owned())
            .await
    }
}
