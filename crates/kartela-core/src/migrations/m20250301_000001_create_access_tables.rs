use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ── kullanicilar ──
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::QrCode).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(16)
                            .not_null()
                            .default("operator"),
                    )
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ── odalar ──
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rooms::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rooms::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Rooms::Name).string().not_null())
                    .col(ColumnDef::new(Rooms::QrCode).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(Rooms::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Rooms::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ── kullanici_yetkileri ──
        manager
            .create_table(
                Table::create()
                    .table(Permissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Permissions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Permissions::UserId).integer().not_null())
                    .col(ColumnDef::new(Permissions::RoomId).integer().not_null())
                    .col(ColumnDef::new(Permissions::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_kullanici_yetkileri_user_room")
                    .table(Permissions::Table)
                    .col(Permissions::UserId)
                    .col(Permissions::RoomId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ── oda_oturumlari ──
        manager
            .create_table(
                Table::create()
                    .table(RoomSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoomSessions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RoomSessions::UserId).integer().not_null())
                    .col(ColumnDef::new(RoomSessions::RoomId).integer().not_null())
                    .col(
                        ColumnDef::new(RoomSessions::TokenHash)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(RoomSessions::ExpiresAt).timestamp().not_null())
                    .col(
                        ColumnDef::new(RoomSessions::Revoked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(RoomSessions::IpAddress).string().null())
                    .col(ColumnDef::new(RoomSessions::UserAgent).string().null())
                    .col(ColumnDef::new(RoomSessions::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoomSessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Permissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    #[iden = "kullanicilar"]
    Table,
    Id,
    Code,
    Name,
    QrCode,
    Role,
    IsActive,
    IsAdmin,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Rooms {
    #[iden = "odalar"]
    Table,
    Id,
    Code,
    Name,
    QrCode,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum Permissions {
    #[iden = "kullanici_yetkileri"]
    Table,
    Id,
    UserId,
    RoomId,
    CreatedAt,
}

#[derive(Iden)]
enum RoomSessions {
    #[iden = "oda_oturumlari"]
    Table,
    Id,
    UserId,
    RoomId,
    TokenHash,
    ExpiresAt,
    Revoked,
    IpAddress,
    UserAgent,
    CreatedAt,
}
