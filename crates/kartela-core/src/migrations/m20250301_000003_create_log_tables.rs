use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ── hareket_loglari ──
        manager
            .create_table(
                Table::create()
                    .table(MovementLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MovementLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MovementLogs::SwatchId).integer().not_null())
                    .col(ColumnDef::new(MovementLogs::Action).string_len(32).not_null())
                    .col(ColumnDef::new(MovementLogs::FromStatus).string_len(32).null())
                    .col(ColumnDef::new(MovementLogs::ToStatus).string_len(32).null())
                    .col(ColumnDef::new(MovementLogs::FromCellId).integer().null())
                    .col(ColumnDef::new(MovementLogs::ToCellId).integer().null())
                    .col(ColumnDef::new(MovementLogs::Reason).string().null())
                    .col(ColumnDef::new(MovementLogs::UserId).integer().null())
                    .col(ColumnDef::new(MovementLogs::RoomId).integer().null())
                    .col(ColumnDef::new(MovementLogs::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hareket_loglari_swatch_id")
                    .table(MovementLogs::Table)
                    .col(MovementLogs::SwatchId)
                    .to_owned(),
            )
            .await?;

        // ── sistem_loglari ──
        manager
            .create_table(
                Table::create()
                    .table(SystemLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SystemLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SystemLogs::UserId).integer().null())
                    .col(ColumnDef::new(SystemLogs::Action).string_len(64).not_null())
                    .col(ColumnDef::new(SystemLogs::Entity).string_len(64).not_null())
                    .col(ColumnDef::new(SystemLogs::EntityId).integer().null())
                    .col(ColumnDef::new(SystemLogs::Detail).text().null())
                    .col(ColumnDef::new(SystemLogs::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SystemLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MovementLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MovementLogs {
    #[iden = "hareket_loglari"]
    Table,
    Id,
    SwatchId,
    Action,
    FromStatus,
    ToStatus,
    FromCellId,
    ToCellId,
    Reason,
    UserId,
    RoomId,
    CreatedAt,
}

#[derive(Iden)]
enum SystemLogs {
    #[iden = "sistem_loglari"]
    Table,
    Id,
    UserId,
    Action,
    Entity,
    EntityId,
    Detail,
    CreatedAt,
}
