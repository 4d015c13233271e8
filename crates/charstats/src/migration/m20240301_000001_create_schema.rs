//! Initial migration creating the vocab and items tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_vocab(manager).await?;
        self.create_items(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vocab::Table).to_owned())
            .await?;
        Ok(())
    }
}

impl Migration {
    async fn create_vocab(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vocab::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vocab::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Vocab::Lang).string().not_null())
                    .col(
                        ColumnDef::new(Vocab::Priority)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Vocab::Style).string().not_null())
                    .col(ColumnDef::new(Vocab::Ilk).string().not_null())
                    // Content
                    .col(ColumnDef::new(Vocab::Writing).string().not_null())
                    .col(ColumnDef::new(Vocab::Reading).string().not_null())
                    .col(
                        ColumnDef::new(Vocab::DefinitionEn)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Vocab::HeisigDefinition)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Vocab::AudioUrl)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    // Difficulty
                    .col(
                        ColumnDef::new(Vocab::Toughness)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Vocab::ToughnessString).string().not_null())
                    .col(
                        ColumnDef::new(Vocab::Starred)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    // Tracking
                    .col(
                        ColumnDef::new(Vocab::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_items(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        // No foreign key to vocab: items may be written before their vocab.
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Items::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Items::Lang).string().not_null())
                    .col(ColumnDef::new(Items::Style).string().not_null())
                    // Timestamps
                    .col(
                        ColumnDef::new(Items::Changed)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Items::Last)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Items::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Items::Next)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // Review statistics
                    .col(
                        ColumnDef::new(Items::Reviews)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Items::Successes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Items::TimeStudied)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Items::Interval)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Items::PreviousInterval)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Items::PreviousSuccess)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    // Ownership
                    .col(ColumnDef::new(Items::VocabId).string().not_null())
                    .col(ColumnDef::new(Items::Part).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Watermark scan
        manager
            .create_index(
                Index::create()
                    .name("idx_items_changed")
                    .table(Items::Table)
                    .col(Items::Changed)
                    .to_owned(),
            )
            .await?;

        // Report join
        manager
            .create_index(
                Index::create()
                    .name("idx_items_vocab_id")
                    .table(Items::Table)
                    .col(Items::VocabId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Vocab {
    Table,
    Id,
    Lang,
    Priority,
    Style,
    Ilk,
    Writing,
    Reading,
    DefinitionEn,
    HeisigDefinition,
    AudioUrl,
    Toughness,
    ToughnessString,
    Starred,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Items {
    Table,
    Id,
    Lang,
    Style,
    Changed,
    Last,
    CreatedAt,
    Next,
    Reviews,
    Successes,
    TimeStudied,
    Interval,
    PreviousInterval,
    PreviousSuccess,
    VocabId,
    Part,
}
