//! 付款实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub concept_id: i64,
    pub debt_id: Option<i64>,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub method: String,
    pub status: String,
    pub reference: Option<String>,
    pub stripe_payment_intent_id: Option<String>,
    pub receipt_path: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub paid_at: Option<i64>,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::payment_concepts::Entity",
        from = "Column::ConceptId",
        to = "super::payment_concepts::Column::Id"
    )]
    Concept,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::payment_concepts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Concept.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payment(self) -> crate::models::payments::entities::Payment {
        use super::timestamp_to_datetime;
        use crate::models::payments::entities::{Payment, PaymentMethod, PaymentStatus};

        Payment {
            id: self.id,
            school_id: self.school_id,
            student_id: self.student_id,
            concept_id: self.concept_id,
            debt_id: self.debt_id,
            amount: self.amount,
            method: self
                .method
                .parse::<PaymentMethod>()
                .unwrap_or(PaymentMethod::Cash),
            status: self
                .status
                .parse::<PaymentStatus>()
                .unwrap_or(PaymentStatus::Pending),
            reference: self.reference,
            stripe_payment_intent_id: self.stripe_payment_intent_id,
            receipt_path: self.receipt_path,
            notes: self.notes,
            paid_at: self.paid_at.map(timestamp_to_datetime),
            created_by: self.created_by,
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}
