use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Domain::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Domain::TenantId).string().not_null())
                    .col(ColumnDef::new(Domain::Id).string().not_null())
                    .col(ColumnDef::new(Domain::Name).string().not_null())
                    .col(ColumnDef::new(Domain::JobId).string().null())
                    .col(ColumnDef::new(Domain::RawStatus).string().null())
                    .col(
                        ColumnDef::new(Domain::Status)
                            .string()
                            .not_null()
                            .default("not_started"),
                    )
                    .col(ColumnDef::new(Domain::LastSynced).string().null())
                    .col(ColumnDef::new(Domain::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Domain::UpdatedAt).string().not_null())
                    .primary_key(Index::create().col(Domain::TenantId).col(Domain::Id))
                    .to_owned(),
            )
            .await?;

        // one catalog entry per name within a tenant
        manager
            .create_index(
                Index::create()
                    .name("idx_domains_tenant_name")
                    .table(Domain::Table)
                    .col(Domain::TenantId)
                    .col(Domain::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // webhook lookups resolve by job id
        manager
            .create_index(
                Index::create()
                    .name("idx_domains_job_id")
                    .table(Domain::Table)
                    .col(Domain::JobId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Domain::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Domain {
    #[sea_orm(iden = "domains")]
    Table,
    TenantId,
    Id,
    Name,
    JobId,
    RawStatus,
    Status,
    LastSynced,
    CreatedAt,
    UpdatedAt,
}
