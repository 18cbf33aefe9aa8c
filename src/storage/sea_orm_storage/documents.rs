//! 文档哈希存储操作

use super::SeaOrmStorage;
use crate::entity::document_hashes::{ActiveModel, Column, Entity as DocumentHashes};
use crate::errors::{AcademiqError, Result};
use crate::models::documents::{
    entities::{DocumentHash, DocumentType},
    requests::NewDocumentHash,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn record_document_hash_impl(&self, hash: NewDocumentHash) -> Result<DocumentHash> {
        let result = ActiveModel {
            school_id: Set(hash.school_id),
            document_type: Set(hash.document_type.to_string()),
            document_id: Set(hash.document_id),
            file_path: Set(hash.file_path),
            sha256: Set(hash.sha256),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AcademiqError::database_operation(format!("记录文档哈希失败: {e}")))?;

        Ok(result.into_document_hash())
    }

    /// 同一文档以最新记录为准
    pub async fn get_latest_document_hash_impl(
        &self,
        school_id: Option<i64>,
        document_type: DocumentType,
        document_id: &str,
    ) -> Result<Option<DocumentHash>> {
        let mut select = DocumentHashes::find()
            .filter(Column::DocumentType.eq(document_type.as_str()))
            .filter(Column::DocumentId.eq(document_id));

        if let Some(school_id) = school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }

        let result = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询文档哈希失败: {e}")))?;

        Ok(result.map(|m| m.into_document_hash()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::seeded;
    use crate::models::documents::{entities::DocumentType, requests::NewDocumentHash};
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_latest_hash_wins() {
        let db = seeded().await;
        for sha in ["aaa", "bbb"] {
            db.storage
                .record_document_hash(NewDocumentHash {
                    school_id: db.school.id,
                    document_type: DocumentType::Receipt,
                    document_id: "42".to_string(),
                    file_path: "public/recibos/recibo-42.pdf".to_string(),
                    sha256: sha.to_string(),
                })
                .await
                .unwrap();
        }

        let latest = db
            .storage
            .get_latest_document_hash(Some(db.school.id), DocumentType::Receipt, "42")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.sha256, "bbb");

        // 不限学校的查询用于公开校验页
        assert!(
            db.storage
                .get_latest_document_hash(None, DocumentType::Receipt, "42")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            db.storage
                .get_latest_document_hash(Some(db.school.id), DocumentType::Report, "42")
                .await
                .unwrap()
                .is_none()
        );
    }
}
