use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Datasets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Datasets::DatasetId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Datasets::DatasetName).text().not_null())
                    .col(ColumnDef::new(Datasets::DatasetType).string().not_null())
                    .col(ColumnDef::new(Datasets::Layer).string().not_null())
                    .col(ColumnDef::new(Datasets::UpstreamDependencies).json().not_null())
                    .col(
                        ColumnDef::new(Datasets::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Datasets::CreatedTs)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Datasets::UpdatedTs)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("idx_datasets_status", Datasets::Status),
            ("idx_datasets_type", Datasets::DatasetType),
            ("idx_datasets_layer", Datasets::Layer),
            ("idx_datasets_created_ts", Datasets::CreatedTs),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Datasets::Table)
                        .col(col)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Datasets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Datasets {
    Table,
    DatasetId,
    DatasetName,
    DatasetType,
    Layer,
    UpstreamDependencies,
    Status,
    CreatedTs,
    UpdatedTs,
}
