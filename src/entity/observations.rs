//! 学生观察记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "observations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub author_id: Option<i64>,
    pub category: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_observation(self) -> crate::models::observations::entities::Observation {
        use crate::models::observations::entities::{Observation, ObservationCategory};

        Observation {
            id: self.id,
            school_id: self.school_id,
            student_id: self.student_id,
            author_id: self.author_id,
            category: self
                .category
                .parse::<ObservationCategory>()
                .unwrap_or(ObservationCategory::General),
            content: self.content,
            created_at: super::timestamp_to_datetime(self.created_at),
        }
    }
}
