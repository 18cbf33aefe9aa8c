//! SPEI 参考号实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "spei_references")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub concept_id: i64,
    pub debt_id: Option<i64>,
    #[sea_orm(unique)]
    pub reference: String,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub status: String,
    pub expires_at: i64,
    pub paid_at: Option<i64>,
    pub payment_id: Option<i64>,
    pub tracking_key: Option<String>,
    pub cancelled_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payments::Entity",
        from = "Column::PaymentId",
        to = "super::payments::Column::Id"
    )]
    Payment,
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_spei_reference(self) -> crate::models::spei::entities::SpeiReference {
        use super::timestamp_to_datetime;
        use crate::models::spei::entities::{SpeiReference, SpeiStatus};

        SpeiReference {
            id: self.id,
            school_id: self.school_id,
            student_id: self.student_id,
            concept_id: self.concept_id,
            debt_id: self.debt_id,
            reference: self.reference,
            amount: self.amount,
            status: self
                .status
                .parse::<SpeiStatus>()
                .unwrap_or(SpeiStatus::Pending),
            expires_at: timestamp_to_datetime(self.expires_at),
            paid_at: self.paid_at.map(timestamp_to_datetime),
            payment_id: self.payment_id,
            tracking_key: self.tracking_key,
            cancelled_at: self.cancelled_at.map(timestamp_to_datetime),
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}
