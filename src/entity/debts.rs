//! 欠款实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "debts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub concept_id: i64,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    /// YYYY-MM-DD
    pub due_date: String,
    pub status: String,
    pub paid_at: Option<i64>,
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
    pub fn into_debt(self) -> crate::models::debts::entities::Debt {
        use super::{parse_date_column, timestamp_to_datetime};
        use crate::models::debts::entities::{Debt, DebtStatus};

        Debt {
            id: self.id,
            school_id: self.school_id,
            student_id: self.student_id,
            concept_id: self.concept_id,
            amount: self.amount,
            due_date: parse_date_column(&self.due_date),
            status: self
                .status
                .parse::<DebtStatus>()
                .unwrap_or(DebtStatus::Pending),
            paid_at: self.paid_at.map(timestamp_to_datetime),
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}
