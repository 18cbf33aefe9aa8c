use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_academic_tables::{Schools, Students, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 缴费项目表 ====================
        manager
            .create_table(
                Table::create()
                    .table(PaymentConcepts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentConcepts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PaymentConcepts::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentConcepts::Name).string().not_null())
                    .col(ColumnDef::new(PaymentConcepts::Description).text().null())
                    .col(
                        ColumnDef::new(PaymentConcepts::DefaultAmount)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentConcepts::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PaymentConcepts::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentConcepts::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PaymentConcepts::Table, PaymentConcepts::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 欠费（adeudos）表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Debts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Debts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Debts::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Debts::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Debts::ConceptId).big_integer().not_null())
                    .col(ColumnDef::new(Debts::Amount).double().not_null())
                    .col(ColumnDef::new(Debts::DueDate).string().not_null())
                    .col(ColumnDef::new(Debts::Status).string().not_null())
                    .col(ColumnDef::new(Debts::PaidAt).big_integer().null())
                    .col(ColumnDef::new(Debts::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Debts::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Debts::Table, Debts::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Debts::Table, Debts::ConceptId)
                            .to(PaymentConcepts::Table, PaymentConcepts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 付款表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::ConceptId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::DebtId).big_integer().null())
                    .col(ColumnDef::new(Payments::Amount).double().not_null())
                    .col(ColumnDef::new(Payments::Method).string().not_null())
                    .col(ColumnDef::new(Payments::Status).string().not_null())
                    .col(ColumnDef::new(Payments::Reference).string().null())
                    .col(
                        ColumnDef::new(Payments::StripePaymentIntentId)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(Payments::ReceiptPath).string().null())
                    .col(ColumnDef::new(Payments::Notes).text().null())
                    .col(ColumnDef::new(Payments::PaidAt).big_integer().null())
                    .col(ColumnDef::new(Payments::CreatedBy).big_integer().null())
                    .col(ColumnDef::new(Payments::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Payments::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::ConceptId)
                            .to(PaymentConcepts::Table, PaymentConcepts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::DebtId)
                            .to(Debts::Table, Debts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== SPEI 待付款参考号表 ====================
        manager
            .create_table(
                Table::create()
                    .table(SpeiReferences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SpeiReferences::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SpeiReferences::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SpeiReferences::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SpeiReferences::ConceptId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SpeiReferences::DebtId).big_integer().null())
                    .col(
                        ColumnDef::new(SpeiReferences::Reference)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SpeiReferences::Amount).double().not_null())
                    .col(ColumnDef::new(SpeiReferences::Status).string().not_null())
                    .col(
                        ColumnDef::new(SpeiReferences::ExpiresAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SpeiReferences::PaidAt).big_integer().null())
                    .col(
                        ColumnDef::new(SpeiReferences::PaymentId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(SpeiReferences::TrackingKey).string().null())
                    .col(
                        ColumnDef::new(SpeiReferences::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SpeiReferences::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SpeiReferences::Table, SpeiReferences::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SpeiReferences::Table, SpeiReferences::DebtId)
                            .to(Debts::Table, Debts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SpeiReferences::Table, SpeiReferences::PaymentId)
                            .to(Payments::Table, Payments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 文档完整性哈希表 ====================
        manager
            .create_table(
                Table::create()
                    .table(DocumentHashes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DocumentHashes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DocumentHashes::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DocumentHashes::DocumentType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DocumentHashes::DocumentId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DocumentHashes::FilePath).string().not_null())
                    .col(ColumnDef::new(DocumentHashes::Sha256).string().not_null())
                    .col(
                        ColumnDef::new(DocumentHashes::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DocumentHashes::Table, DocumentHashes::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 索引 ====================
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_debts_student_status")
                    .table(Debts::Table)
                    .col(Debts::StudentId)
                    .col(Debts::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payments_school_paid_at")
                    .table(Payments::Table)
                    .col(Payments::SchoolId)
                    .col(Payments::PaidAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payments_stripe_intent")
                    .table(Payments::Table)
                    .col(Payments::StripePaymentIntentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_spei_status_expires")
                    .table(SpeiReferences::Table)
                    .col(SpeiReferences::Status)
                    .col(SpeiReferences::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_document_hashes_type_id")
                    .table(DocumentHashes::Table)
                    .col(DocumentHashes::DocumentType)
                    .col(DocumentHashes::DocumentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DocumentHashes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SpeiReferences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Debts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentConcepts::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum PaymentConcepts {
    #[sea_orm(iden = "payment_concepts")]
    Table,
    Id,
    SchoolId,
    Name,
    Description,
    DefaultAmount,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Debts {
    #[sea_orm(iden = "debts")]
    Table,
    Id,
    SchoolId,
    StudentId,
    ConceptId,
    Amount,
    DueDate,
    Status,
    PaidAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Payments {
    #[sea_orm(iden = "payments")]
    Table,
    Id,
    SchoolId,
    StudentId,
    ConceptId,
    DebtId,
    Amount,
    Method,
    Status,
    Reference,
    StripePaymentIntentId,
    ReceiptPath,
    Notes,
    PaidAt,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SpeiReferences {
    #[sea_orm(iden = "spei_references")]
    Table,
    Id,
    SchoolId,
    StudentId,
    ConceptId,
    DebtId,
    Reference,
    Amount,
    Status,
    ExpiresAt,
    PaidAt,
    PaymentId,
    TrackingKey,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DocumentHashes {
    #[sea_orm(iden = "document_hashes")]
    Table,
    Id,
    SchoolId,
    DocumentType,
    DocumentId,
    FilePath,
    Sha256,
    CreatedAt,
}
