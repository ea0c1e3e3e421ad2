use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ── dolaplar ──
        manager
            .create_table(
                Table::create()
                    .table(Cabinets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cabinets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cabinets::RoomId).integer().not_null())
                    .col(ColumnDef::new(Cabinets::Code).string().not_null())
                    .col(ColumnDef::new(Cabinets::Name).string().not_null())
                    .col(ColumnDef::new(Cabinets::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ── raflar ──
        manager
            .create_table(
                Table::create()
                    .table(Shelves::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Shelves::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Shelves::CabinetId).integer().not_null())
                    .col(ColumnDef::new(Shelves::Code).string().not_null())
                    .col(ColumnDef::new(Shelves::Capacity).integer().not_null())
                    .col(ColumnDef::new(Shelves::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ── hucreler ──
        manager
            .create_table(
                Table::create()
                    .table(Cells::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cells::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cells::ShelfId).integer().not_null())
                    .col(ColumnDef::new(Cells::Code).string().not_null())
                    .col(ColumnDef::new(Cells::Capacity).integer().not_null())
                    .col(ColumnDef::new(Cells::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ── musteriler ──
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Customers::Name).string().not_null())
                    .col(
                        ColumnDef::new(Customers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Customers::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Customers::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ── kartelalar ──
        manager
            .create_table(
                Table::create()
                    .table(Swatches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Swatches::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Swatches::Number).string().not_null().unique_key())
                    .col(ColumnDef::new(Swatches::ColorCode).string().not_null())
                    .col(ColumnDef::new(Swatches::ColorName).string().not_null())
                    .col(ColumnDef::new(Swatches::PantoneCode).string().null())
                    .col(
                        ColumnDef::new(Swatches::Status)
                            .string_len(32)
                            .not_null()
                            .default("AKTIF"),
                    )
                    .col(
                        ColumnDef::new(Swatches::SlotsUsed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Swatches::SlotsMax).integer().not_null())
                    .col(ColumnDef::new(Swatches::CustomerId).integer().null())
                    .col(ColumnDef::new(Swatches::CellId).integer().null())
                    .col(
                        ColumnDef::new(Swatches::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Swatches::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Swatches::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_kartelalar_cell_id")
                    .table(Swatches::Table)
                    .col(Swatches::CellId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_kartelalar_customer_id")
                    .table(Swatches::Table)
                    .col(Swatches::CustomerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Swatches::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cells::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Shelves::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cabinets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Cabinets {
    #[iden = "dolaplar"]
    Table,
    Id,
    RoomId,
    Code,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum Shelves {
    #[iden = "raflar"]
    Table,
    Id,
    CabinetId,
    Code,
    Capacity,
    CreatedAt,
}

#[derive(Iden)]
enum Cells {
    #[iden = "hucreler"]
    Table,
    Id,
    ShelfId,
    Code,
    Capacity,
    CreatedAt,
}

#[derive(Iden)]
enum Customers {
    #[iden = "musteriler"]
    Table,
    Id,
    Code,
    Name,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Swatches {
    #[iden = "kartelalar"]
    Table,
    Id,
    Number,
    ColorCode,
    ColorName,
    PantoneCode,
    Status,
    SlotsUsed,
    SlotsMax,
    CustomerId,
    CellId,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}
