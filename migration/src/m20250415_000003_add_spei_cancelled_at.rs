use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// 人工取消与自然过期同为 caducado，靠取消时间区分
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(SpeiReferences::Table)
                    .add_column(
                        ColumnDef::new(SpeiReferences::CancelledAt)
                            .big_integer()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(SpeiReferences::Table)
                    .drop_column(SpeiReferences::CancelledAt)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum SpeiReferences {
    #[sea_orm(iden = "spei_references")]
    Table,
    CancelledAt,
}
