//! 文档完整性哈希实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "document_hashes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub document_type: String,
    pub document_id: String,
    pub file_path: String,
    pub sha256: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_document_hash(self) -> crate::models::documents::entities::DocumentHash {
        use crate::models::documents::entities::{DocumentHash, DocumentType};

        DocumentHash {
            id: self.id,
            school_id: self.school_id,
            document_type: self
                .document_type
                .parse::<DocumentType>()
                .unwrap_or(DocumentType::Receipt),
            document_id: self.document_id,
            file_path: self.file_path,
            sha256: self.sha256,
            created_at: super::timestamp_to_datetime(self.created_at),
        }
    }
}
